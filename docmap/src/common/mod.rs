//! Common value types shared by every layer of docmap.
//!
//! - [`Value`] - the tagged union of everything a field can hold
//! - [`Document`] - an insertion-ordered field map, the wire shape of a record
//! - [`ObjectId`] - the backend-native 12-byte identifier
//! - constants and small lock/time helpers

mod constants;
mod document;
mod object_id;
mod util;
mod value;

pub use constants::*;
pub use document::*;
pub use object_id::*;
pub use util::*;
pub use value::*;
