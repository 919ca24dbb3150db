//! Entity declarations and the instances mapped from them.
//!
//! - [`EntityType`] - a declared entity with its assembled [`Schema`](crate::schema::Schema)
//! - [`TypeRegistry`] - name to entity type lookup with most-derived resolution
//! - [`Instance`] - one live document with dirty-field tracking
//! - [`Manager`] - the query and persistence facade bound to an entity type
//! - [`InstanceCursor`] - hydrates raw query results lazily

mod cursor;
mod entity_type;
mod instance;
mod manager;
mod registry;

pub use cursor::*;
pub use entity_type::*;
pub use instance::*;
pub use manager::*;
pub use registry::*;
