use crate::common::DOC_ID;
use crate::schema::FieldDescriptor;
use indexmap::IndexMap;

/// The inheritance-resolved field table of one entity type, plus the name
/// of the collection its documents live in.
///
/// A schema is assembled once when its entity type is declared and is never
/// mutated afterwards, so it is shared freely between instances and managers.
#[derive(Debug, Clone)]
pub struct Schema {
    collection_name: String,
    fields: IndexMap<String, FieldDescriptor>,
}

impl Schema {
    /// Merges field tables along an ancestor chain.
    ///
    /// `levels` runs from the root ancestor down to the entity being declared.
    /// Each level's descriptors are inserted in declaration order; a name seen
    /// at an earlier level keeps its position but takes the later descriptor
    /// whole.
    pub fn assemble<'a, I>(collection_name: &str, levels: I) -> Self
    where
        I: IntoIterator<Item = &'a [FieldDescriptor]>,
    {
        let mut fields: IndexMap<String, FieldDescriptor> = IndexMap::new();
        for level in levels {
            for descriptor in level {
                fields.insert(descriptor.name().to_string(), descriptor.clone());
            }
        }

        Schema {
            collection_name: collection_name.to_string(),
            fields,
        }
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field descriptors in schema order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether `name` is the identity field, which is never dirty-tracked.
    pub fn is_identity(&self, name: &str) -> bool {
        name == DOC_ID
    }
}
