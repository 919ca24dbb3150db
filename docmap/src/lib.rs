#![allow(clippy::module_inception)]
//! # docmap - Asynchronous Object-Document Mapper
//!
//! docmap binds schema-declared entity types to documents stored in a
//! document database. An entity type is declared once with its collection,
//! its parent and its field descriptors; instances are then created,
//! mutated, saved, updated, reloaded and removed without writing wire
//! queries by hand.
//!
//! ## Key Features
//!
//! - **Typed fields**: every field declares a [`FieldType`](schema::FieldType)
//!   and raw values are coerced on assignment and hydration; mismatches are
//!   dropped instead of raised
//! - **Inheritance**: a schema is the ordered union of every ancestor's fields,
//!   the most derived declaration winning
//! - **Dirty tracking**: `update` writes only the fields assigned since the last
//!   successful persistence, and skips the round-trip when nothing changed
//! - **Lazy resolution**: [`TypeRegistry::resolve`](entity::TypeRegistry::resolve)
//!   maps a name to its most-derived registered subtype
//! - **Pluggable backend**: the wire layer is a
//!   [`DatabaseGateway`](gateway::DatabaseGateway); an in-memory gateway ships
//!   with the crate
//!
//! ## Quick Start
//!
//! ```rust
//! use docmap::common::ObjectId;
//! use docmap::entity::EntityType;
//! use docmap::gateway::memory::MemoryGateway;
//! use docmap::gateway::Database;
//! use docmap::schema::FieldDescriptor;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let db = Database::builder()
//!     .endpoints(&["localhost:27027", "localhost:27028"])
//!     .database_name("test")
//!     .connect(MemoryGateway::new())
//!     .unwrap();
//!
//! let entity = EntityType::builder("CollectionTest")
//!     .collection("collection_test")
//!     .field(FieldDescriptor::object_id("_id"))
//!     .field(FieldDescriptor::string("string_attr"))
//!     .database(&db)
//!     .build()
//!     .unwrap();
//!
//! let id = ObjectId::new();
//! let mut instance = entity.new_instance();
//! instance.set("_id", id);
//! instance.set("string_attr", "a");
//! instance.save().await.unwrap();
//!
//! instance.set("string_attr", "b");
//! assert_eq!(instance.dirty_fields(), vec!["string_attr"]);
//! instance.update(false).await.unwrap();
//!
//! let loaded = entity.objects().find_one(id).await.unwrap().into_result().unwrap().flatten().unwrap();
//! assert_eq!(loaded.get("string_attr"), Some(&"b".into()));
//! assert!(loaded.dirty_fields().is_empty());
//! # });
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - values, documents, object ids and shared helpers
//! - [`errors`] - error types and result definitions
//! - [`schema`] - field descriptors and schema assembly
//! - [`entity`] - entity types, the type registry, instances and managers
//! - [`gateway`] - the database boundary and the in-memory gateway

use crate::common::*;
use crate::entity::TypeRegistry;
use crate::gateway::Database;
use std::sync::LazyLock;

pub mod common;
pub mod entity;
pub mod errors;
pub mod gateway;
pub mod schema;

pub(crate) static ID_GENERATOR: LazyLock<ObjectIdGenerator> = LazyLock::new(ObjectIdGenerator::new);

pub(crate) static GLOBAL_DATABASE: LazyLock<Database> = LazyLock::new(Database::new);

pub(crate) static GLOBAL_REGISTRY: LazyLock<TypeRegistry> = LazyLock::new(TypeRegistry::new);
