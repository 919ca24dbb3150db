use crate::common::{Document, Value, DOC_ID};
use crate::entity::EntityType;
use crate::errors::{ErrorKind, OdmError, OdmResult};
use crate::gateway::{Completion, Query, UpdateOptions, WriteResult};
use indexmap::IndexSet;
use std::fmt::{Debug, Formatter};

/// Where an [Instance] is in its persistence lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    /// Constructed in memory, never saved.
    Transient,
    /// Saved, updated or loaded, with no outstanding changes.
    PersistedClean,
    /// Persisted and mutated since.
    PersistedDirty,
    /// Deleted from the backend.
    Removed,
}

/// One live document bound to an [EntityType].
///
/// Values are stored in three places:
///
/// - schema values, coerced through the field descriptors, plus the `_id`
/// - pass-through keys, which came from a raw record but have no descriptor
/// - ad-hoc attributes set later under names the schema does not know
///
/// Every assignment after construction records the name in the dirty set,
/// except assignments to `_id`. [Instance::as_dict] renders schema values in
/// schema order followed by pass-through keys; ad-hoc attributes are only
/// written to the backend.
///
/// # Examples
///
/// ```rust
/// use docmap::common::ObjectId;
/// use docmap::entity::EntityType;
/// use docmap::schema::FieldDescriptor;
///
/// let entity = EntityType::builder("CollectionTest")
///     .field(FieldDescriptor::object_id("_id"))
///     .field(FieldDescriptor::string("string_attr"))
///     .build()
///     .unwrap();
///
/// let mut instance = entity.new_instance();
/// instance.set("_id", ObjectId::new());
/// instance.set("string_attr", "a");
/// assert_eq!(instance.dirty_fields(), vec!["string_attr"]);
/// ```
#[derive(Clone)]
pub struct Instance {
    entity_type: EntityType,
    values: Document,
    pass_through: Document,
    attributes: Document,
    dirty: IndexSet<String>,
    state: InstanceState,
}

impl Instance {
    pub(crate) fn with_defaults(entity_type: EntityType) -> Self {
        let mut values = Document::new();
        for field in entity_type.schema().fields() {
            if let Some(value) = field.produce_default() {
                values.put(field.name(), value);
            }
        }

        Instance {
            entity_type,
            values,
            pass_through: Document::new(),
            attributes: Document::new(),
            dirty: IndexSet::new(),
            state: InstanceState::Transient,
        }
    }

    pub(crate) fn from_raw(entity_type: EntityType, raw: Document, persisted: bool) -> Self {
        let mut values = Document::new();
        let mut pass_through = Document::new();

        for (key, value) in raw {
            match entity_type.schema().field(&key) {
                Some(field) => {
                    if let Some(coerced) = field.coerce(value) {
                        values.put(key, coerced);
                    }
                }
                None if entity_type.schema().is_identity(&key) => values.put(key, value),
                None => pass_through.put(key, value),
            }
        }

        Instance {
            entity_type,
            values,
            pass_through,
            attributes: Document::new(),
            dirty: IndexSet::new(),
            state: if persisted {
                InstanceState::PersistedClean
            } else {
                InstanceState::Transient
            },
        }
    }

    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    pub fn collection_name(&self) -> &str {
        self.entity_type.collection_name()
    }

    pub fn state(&self) -> InstanceState {
        self.state
    }

    pub fn id(&self) -> Option<&Value> {
        self.values.get(DOC_ID)
    }

    /// Assigns `value` to `name`.
    ///
    /// Schema fields coerce the value first; a rejected value leaves the
    /// field untouched and returns `false`. Any other name is accepted.
    pub fn set<T: Into<Value>>(&mut self, name: &str, value: T) -> bool {
        let value = value.into();
        match self.entity_type.schema().field(name) {
            Some(field) => match field.coerce(value) {
                Some(coerced) => self.values.put(name, coerced),
                None => return false,
            },
            None if self.entity_type.schema().is_identity(name) => self.values.put(name, value),
            None if self.pass_through.contains_key(name) => self.pass_through.put(name, value),
            None => self.attributes.put(name, value),
        }

        self.mark_dirty(name);
        true
    }

    /// Reads a schema value, then a pass-through key, then an ad-hoc attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .get(name)
            .or_else(|| self.pass_through.get(name))
            .or_else(|| self.attributes.get(name))
    }

    /// Removes the value stored under `name`; a partial update then writes `Null`.
    pub fn unset(&mut self, name: &str) -> Option<Value> {
        let removed = self
            .values
            .remove(name)
            .or_else(|| self.pass_through.remove(name))
            .or_else(|| self.attributes.remove(name));
        if removed.is_some() {
            self.mark_dirty(name);
        }
        removed
    }

    /// Renders `_id`, every schema value in schema order, then pass-through keys.
    pub fn as_dict(&self) -> Document {
        let schema = self.entity_type.schema();
        let mut document = Document::new();

        if !schema.has_field(DOC_ID) {
            if let Some(id) = self.id() {
                document.put(DOC_ID, id.clone());
            }
        }

        for name in schema.field_names() {
            if let Some(value) = self.values.get(name) {
                document.put(name, value.clone());
            }
        }

        document.merge(&self.pass_through);
        document
    }

    /// Names assigned since the last successful persistence, in assignment order.
    pub fn dirty_fields(&self) -> Vec<&str> {
        self.dirty.iter().map(String::as_str).collect()
    }

    pub fn is_field_dirty(&self, name: &str) -> bool {
        self.dirty.contains(name)
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// The partial update payload: each dirty name with its current value,
    /// `Null` where the value was unset.
    pub fn dirty_document(&self) -> Document {
        self.dirty
            .iter()
            .map(|name| (name.as_str(), self.get(name).cloned().unwrap_or_default()))
            .collect()
    }

    /// Inserts the full value set, ad-hoc attributes included.
    ///
    /// Fails with `you must be connect` before any wire call when the entity
    /// type's database is disconnected. Backend failures come back inside the
    /// [Completion] and leave the dirty set as it was.
    pub async fn save(&mut self) -> OdmResult<Completion<WriteResult>> {
        self.ensure_not_removed("save")?;
        let gateway = self.entity_type.database().gateway()?;

        let document = self.full_document();
        let completion = gateway.execute_insert(self.collection_name(), document).await;

        if let Some(result) = completion.result() {
            if completion.is_ok() {
                if self.id().is_none() {
                    if let Some(id) = result.affected_ids().first() {
                        self.values.put(DOC_ID, id.clone());
                    }
                }
                self.mark_clean();
            }
        }
        Ok(completion)
    }

    /// Writes the dirty fields, or the full value set when `force` is set.
    ///
    /// With nothing dirty and no `force` the call completes as
    /// [Completion::skipped] without reaching the backend. The dirty set is
    /// cleared only when the backend acknowledged the write.
    pub async fn update(&mut self, force: bool) -> OdmResult<Completion<WriteResult>> {
        self.ensure_not_removed("update")?;
        let gateway = self.entity_type.database().gateway()?;

        if !force && self.dirty.is_empty() {
            log::debug!("Nothing to update on {}", self.entity_type.name());
            return Ok(Completion::skipped());
        }

        let identity = self.identity_query("update")?;
        let (document, options) = if force {
            (self.full_document(), UpdateOptions::full_replace())
        } else {
            (self.dirty_document(), UpdateOptions::partial())
        };

        let completion = gateway
            .execute_update(self.collection_name(), &identity, document, &options)
            .await;
        if completion.is_ok() && acknowledged(&completion) {
            self.mark_clean();
        } else if completion.is_ok() {
            log::warn!(
                "Update of {} matched no document, keeping dirty fields",
                self.entity_type.name()
            );
        }
        Ok(completion)
    }

    /// Deletes the stored document by `_id`. The instance becomes
    /// [InstanceState::Removed] only when a document was actually deleted.
    pub async fn remove(&mut self) -> OdmResult<Completion<WriteResult>> {
        self.ensure_not_removed("remove")?;
        let gateway = self.entity_type.database().gateway()?;

        let identity = self.identity_query("remove")?;
        let completion = gateway.execute_delete(self.collection_name(), &identity).await;
        if completion.is_ok() && acknowledged(&completion) {
            self.state = InstanceState::Removed;
        } else if completion.is_ok() {
            log::warn!("Remove of {} matched no document", self.entity_type.name());
        }
        Ok(completion)
    }

    fn full_document(&self) -> Document {
        let mut document = self.as_dict();
        document.merge(&self.attributes);
        document
    }

    fn mark_dirty(&mut self, name: &str) {
        if self.entity_type.schema().is_identity(name) {
            return;
        }
        self.dirty.insert(name.to_string());
        if self.state == InstanceState::PersistedClean {
            self.state = InstanceState::PersistedDirty;
        }
    }

    fn mark_clean(&mut self) {
        if !self.dirty.is_empty() {
            log::debug!(
                "Clearing dirty fields {:?} of {}",
                self.dirty,
                self.entity_type.name()
            );
        }
        self.dirty.clear();
        self.state = InstanceState::PersistedClean;
    }

    fn identity_query(&self, operation: &str) -> OdmResult<Query> {
        match self.id() {
            Some(id) if !id.is_null() => Ok(Query::Id(id.clone())),
            _ => {
                log::error!(
                    "Cannot {} {} without an _id",
                    operation,
                    self.entity_type.name()
                );
                Err(OdmError::new(
                    &format!("Cannot {} {} without an _id", operation, self.entity_type.name()),
                    ErrorKind::NotIdentifiable,
                ))
            }
        }
    }

    fn ensure_not_removed(&self, operation: &str) -> OdmResult<()> {
        if self.state == InstanceState::Removed {
            log::error!("Cannot {} a removed {}", operation, self.entity_type.name());
            return Err(OdmError::new(
                &format!("Cannot {} a removed {}", operation, self.entity_type.name()),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("entity_type", &self.entity_type.name())
            .field("state", &self.state)
            .field("values", &self.as_dict())
            .field("dirty", &self.dirty)
            .finish()
    }
}

fn acknowledged(completion: &Completion<WriteResult>) -> bool {
    completion.result().is_some_and(|result| result.ack_count() > 0)
}
