mod create_from_raw_test;
mod lazy_resolution_test;
mod schema_inheritance_test;
