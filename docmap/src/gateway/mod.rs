//! The boundary to the database.
//!
//! Everything above this module speaks in [`Document`](crate::common::Document)s
//! and [`Query`]s; everything below it is a [`DatabaseGateway`] implementation.
//!
//! - [`Database`] - the connection handle; persistence checks it before any wire call
//! - [`DatabaseConfig`] / [`DatabaseBuilder`] - endpoints, database name and pool options
//! - [`Completion`] - the single completion channel carrying `(result, error)`
//! - [`memory`] - a complete in-process gateway

mod completion;
mod config;
mod database;
mod database_builder;
mod database_gateway;
pub mod memory;
mod query;
mod update_options;

pub use completion::*;
pub use config::*;
pub use database::*;
pub use database_builder::*;
pub use database_gateway::*;
pub use query::*;
pub use update_options::*;
