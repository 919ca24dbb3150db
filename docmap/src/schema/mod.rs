//! Field descriptors and the inheritance-resolved schemas built from them.
//!
//! A [`FieldDescriptor`] declares one attribute's name, [`FieldType`] and an
//! optional [`DefaultValue`]. A [`Schema`] is the ordered union of every
//! descriptor along an entity type's ancestor chain.

mod field;
mod schema;

pub use field::*;
pub use schema::*;
