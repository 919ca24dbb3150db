use crate::common::{Document, Value};
use crate::entity::{EntityType, Instance, InstanceCursor};
use crate::errors::OdmResult;
use crate::gateway::{Completion, Query, WriteResult};

/// The query and persistence facade of one entity type.
///
/// A manager holds nothing but its entity type, so it is cheap to obtain
/// through [EntityType::objects] and safe to share. Every call checks the
/// connection first and fails with `you must be connect` while the entity
/// type's database is disconnected; backend failures come back inside the
/// [Completion].
///
/// # Examples
///
/// ```rust
/// use docmap::doc;
/// use docmap::entity::EntityType;
/// use docmap::schema::FieldDescriptor;
///
/// let entity = EntityType::builder("CollectionTest")
///     .field(FieldDescriptor::string("string_attr"))
///     .build()
///     .unwrap();
///
/// let instance = entity.objects().create(doc! { string_attr: "a", extra: 1 });
/// assert_eq!(instance.as_dict().size(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Manager {
    entity_type: EntityType,
}

impl Manager {
    pub(crate) fn new(entity_type: EntityType) -> Self {
        Manager { entity_type }
    }

    pub fn entity_type(&self) -> &EntityType {
        &self.entity_type
    }

    /// Builds a transient instance from a raw record.
    pub fn create(&self, raw: Document) -> Instance {
        self.entity_type.create(raw)
    }

    /// Every stored document matching `query`, hydrated lazily.
    pub async fn find<Q: Into<Query>>(&self, query: Q) -> OdmResult<Completion<InstanceCursor>> {
        let query = query.into();
        let gateway = self.entity_type.database().gateway()?;
        let completion = gateway
            .execute_query(self.entity_type.collection_name(), &query, false)
            .await;
        let entity_type = self.entity_type.clone();
        Ok(completion.map(|cursor| InstanceCursor::new(cursor, entity_type)))
    }

    /// The first stored document matching `query`, if any.
    pub async fn find_one<Q: Into<Query>>(&self, query: Q) -> OdmResult<Completion<Option<Instance>>> {
        let query = query.into();
        let gateway = self.entity_type.database().gateway()?;
        let completion = gateway
            .execute_query(self.entity_type.collection_name(), &query, true)
            .await;
        let entity_type = self.entity_type.clone();
        Ok(completion.map(|cursor| InstanceCursor::new(cursor, entity_type).next()))
    }

    /// Number of stored documents matching `query`.
    pub async fn count<Q: Into<Query>>(&self, query: Q) -> OdmResult<Completion<u64>> {
        let query = query.into();
        let gateway = self.entity_type.database().gateway()?;
        let completion = gateway
            .execute_query(self.entity_type.collection_name(), &query, false)
            .await;
        Ok(completion.map(|cursor| cursor.count() as u64))
    }

    /// Distinct values of `key` across the documents matching `query`, in
    /// first-seen order. Documents without `key` are skipped.
    pub async fn distinct<Q: Into<Query>>(&self, key: &str, query: Q) -> OdmResult<Completion<Vec<Value>>> {
        let query = query.into();
        let gateway = self.entity_type.database().gateway()?;
        let completion = gateway
            .execute_query(self.entity_type.collection_name(), &query, false)
            .await;
        Ok(completion.map(|cursor| {
            let mut values: Vec<Value> = Vec::new();
            for document in cursor {
                if let Some(value) = document.get(key) {
                    if !values.contains(value) {
                        values.push(value.clone());
                    }
                }
            }
            values
        }))
    }

    /// Deletes every document of the collection.
    pub async fn truncate(&self) -> OdmResult<Completion<WriteResult>> {
        let gateway = self.entity_type.database().gateway()?;
        log::info!("Truncating collection {}", self.entity_type.collection_name());
        Ok(gateway
            .execute_delete(self.entity_type.collection_name(), &Query::All)
            .await)
    }

    pub async fn save(&self, instance: &mut Instance) -> OdmResult<Completion<WriteResult>> {
        instance.save().await
    }

    pub async fn update(&self, instance: &mut Instance, force: bool) -> OdmResult<Completion<WriteResult>> {
        instance.update(force).await
    }

    pub async fn remove(&self, instance: &mut Instance) -> OdmResult<Completion<WriteResult>> {
        instance.remove().await
    }
}
