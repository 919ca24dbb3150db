use crate::common::{Document, ROOT_DEPTH};
use crate::entity::{Instance, Manager, TypeRegistry};
use crate::errors::{ErrorKind, OdmError, OdmResult};
use crate::gateway::Database;
use crate::schema::{FieldDescriptor, Schema};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A declared entity: its name, its parent, its own field descriptors and
/// the schema assembled from its whole ancestor chain.
///
/// Entity types are immutable handles; clones share one declaration and
/// compare equal only to clones of themselves.
///
/// # Examples
///
/// ```rust
/// use docmap::entity::EntityType;
/// use docmap::schema::FieldDescriptor;
///
/// let base = EntityType::builder("CollectionTest")
///     .collection("collection_test")
///     .field(FieldDescriptor::object_id("_id"))
///     .field(FieldDescriptor::string("string_attr"))
///     .build()
///     .unwrap();
///
/// let child = EntityType::builder("ChildCollectionTest")
///     .extends(&base)
///     .field(FieldDescriptor::long("counter"))
///     .build()
///     .unwrap();
///
/// assert_eq!(child.collection_name(), "collection_test");
/// assert_eq!(child.schema().len(), 3);
/// assert!(child.is_subtype_of(&base));
/// ```
#[derive(Clone)]
pub struct EntityType {
    inner: Arc<EntityTypeInner>,
}

struct EntityTypeInner {
    name: String,
    parent: Option<EntityType>,
    own_fields: Vec<FieldDescriptor>,
    schema: Schema,
    depth: usize,
    database: Database,
}

impl EntityType {
    pub fn builder(name: &str) -> EntityTypeBuilder {
        EntityTypeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn parent(&self) -> Option<&EntityType> {
        self.inner.parent.as_ref()
    }

    /// The fields declared at this level only.
    pub fn own_fields(&self) -> &[FieldDescriptor] {
        &self.inner.own_fields
    }

    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    pub fn collection_name(&self) -> &str {
        self.inner.schema.collection_name()
    }

    /// Number of ancestors above this type.
    pub fn depth(&self) -> usize {
        self.inner.depth
    }

    pub fn database(&self) -> &Database {
        &self.inner.database
    }

    /// Returns true if `other` is this type or one of its ancestors.
    pub fn is_subtype_of(&self, other: &EntityType) -> bool {
        let mut current = Some(self);
        while let Some(entity_type) = current {
            if entity_type == other {
                return true;
            }
            current = entity_type.parent();
        }
        false
    }

    /// A fresh transient instance with every field default applied.
    pub fn new_instance(&self) -> Instance {
        Instance::with_defaults(self.clone())
    }

    /// A transient instance built from a raw record without applying defaults.
    pub fn create(&self, raw: Document) -> Instance {
        Instance::from_raw(self.clone(), raw, false)
    }

    /// A clean instance built from a stored record.
    pub fn hydrate(&self, raw: Document) -> Instance {
        Instance::from_raw(self.clone(), raw, true)
    }

    /// The manager bound to this entity type.
    pub fn objects(&self) -> Manager {
        Manager::new(self.clone())
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for EntityType {}

impl Debug for EntityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityType")
            .field("name", &self.inner.name)
            .field("parent", &self.parent().map(EntityType::name))
            .field("collection", &self.collection_name())
            .field("fields", &self.schema().field_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Declares an [EntityType].
///
/// The collection name defaults to the parent's collection, or to the entity
/// name for a root type. The database handle defaults to the parent's, or to
/// [Database::global].
pub struct EntityTypeBuilder {
    name: String,
    collection: Option<String>,
    parent: Option<EntityType>,
    fields: Vec<FieldDescriptor>,
    database: Option<Database>,
}

impl EntityTypeBuilder {
    pub fn new(name: &str) -> Self {
        EntityTypeBuilder {
            name: name.to_string(),
            collection: None,
            parent: None,
            fields: Vec::new(),
            database: None,
        }
    }

    pub fn collection(mut self, collection_name: &str) -> Self {
        self.collection = Some(collection_name.to_string());
        self
    }

    pub fn extends(mut self, parent: &EntityType) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    /// Declares a field. A second declaration with the same name replaces the first.
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        match self.fields.iter_mut().find(|f| f.name() == descriptor.name()) {
            Some(existing) => *existing = descriptor,
            None => self.fields.push(descriptor),
        }
        self
    }

    pub fn fields<I: IntoIterator<Item = FieldDescriptor>>(self, descriptors: I) -> Self {
        descriptors.into_iter().fold(self, |builder, d| builder.field(d))
    }

    pub fn database(mut self, database: &Database) -> Self {
        self.database = Some(database.clone());
        self
    }

    /// Assembles the schema and creates the entity type.
    pub fn build(self) -> OdmResult<EntityType> {
        if self.name.trim().is_empty() {
            log::error!("Entity type name cannot be empty");
            return Err(OdmError::new(
                "Entity type name cannot be empty",
                ErrorKind::InvalidConfiguration,
            ));
        }

        if let Some(collection) = &self.collection {
            if collection.trim().is_empty() {
                log::error!("Collection name of {} cannot be empty", self.name);
                return Err(OdmError::new(
                    &format!("Collection name of {} cannot be empty", self.name),
                    ErrorKind::InvalidConfiguration,
                ));
            }
        }

        let collection_name = match (&self.collection, &self.parent) {
            (Some(collection), _) => collection.clone(),
            (None, Some(parent)) => parent.collection_name().to_string(),
            (None, None) => self.name.clone(),
        };

        let mut ancestors = Vec::new();
        let mut current = self.parent.as_ref();
        while let Some(ancestor) = current {
            ancestors.push(ancestor);
            current = ancestor.parent();
        }

        let levels = ancestors
            .iter()
            .rev()
            .map(|ancestor| ancestor.own_fields())
            .chain(std::iter::once(self.fields.as_slice()));
        let schema = Schema::assemble(&collection_name, levels);

        let depth = self.parent.as_ref().map_or(ROOT_DEPTH, |p| p.depth() + 1);
        let database = match (self.database, &self.parent) {
            (Some(database), _) => database,
            (None, Some(parent)) => parent.database().clone(),
            (None, None) => Database::global(),
        };

        log::debug!(
            "Declared entity type {} on collection {} with fields {:?}",
            self.name,
            collection_name,
            schema.field_names().collect::<Vec<_>>()
        );

        Ok(EntityType {
            inner: Arc::new(EntityTypeInner {
                name: self.name,
                parent: self.parent,
                own_fields: self.fields,
                schema,
                depth,
                database,
            }),
        })
    }

    /// Builds the entity type and registers it in `registry`.
    pub fn register(self, registry: &TypeRegistry) -> OdmResult<EntityType> {
        let entity_type = self.build()?;
        registry.register(entity_type.clone());
        Ok(entity_type)
    }
}
