//! An in-process [`DatabaseGateway`](crate::gateway::DatabaseGateway).
//!
//! [`MemoryGateway`] keeps every collection in memory and is used by the
//! test-suites and by applications that want the mapping layer without a
//! database server.

mod memory_gateway;

pub use memory_gateway::*;
