mod dirty_tracking_test;
mod manager_test;
