mod database_test;
mod backend_failure_test;
