use crate::common::{Document, ObjectId, Value};

/// Which documents an operation targets.
///
/// Queries are deliberately small: everything, one identity, or a set of
/// top-level field equalities.
///
/// # Examples
///
/// ```rust
/// use docmap::doc;
/// use docmap::common::ObjectId;
/// use docmap::gateway::Query;
///
/// let id = ObjectId::new();
/// assert_eq!(Query::from(id), Query::by_id(id));
/// assert!(Query::from(doc! { name: "x" }).matches(&doc! { name: "x", age: 3 }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    All,
    Id(Value),
    Matching(Document),
}

impl Query {
    pub fn by_id<T: Into<Value>>(id: T) -> Self {
        Query::Id(id.into())
    }

    pub fn matching(filter: Document) -> Self {
        Query::Matching(filter)
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Query::All => true,
            Query::Id(id) => document.id() == Some(id),
            Query::Matching(filter) => document.matches(filter),
        }
    }
}

impl Default for Query {
    fn default() -> Self {
        Query::All
    }
}

impl From<ObjectId> for Query {
    fn from(id: ObjectId) -> Self {
        Query::Id(Value::ObjectId(id))
    }
}

impl From<Value> for Query {
    fn from(id: Value) -> Self {
        Query::Id(id)
    }
}

impl From<Document> for Query {
    fn from(filter: Document) -> Self {
        Query::Matching(filter)
    }
}
