use crate::common::{Document, ObjectId};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use rust_decimal::Decimal;
use std::fmt::{Debug, Display, Formatter};
use uuid::Uuid;

/// Represents a field value. It can be a scalar like [Value::I32] or
/// [Value::String], or a container like [Value::Document] or [Value::Array].
///
/// # Variants
/// - Null: an explicitly stored null
/// - Bool, I32, I64, F64, Decimal: booleans and numbers
/// - String: text, also the carrier for url and email fields
/// - DateTime: a UTC timestamp
/// - ObjectId: the backend-native identifier
/// - Uuid: a 128-bit UUID
/// - Array: an ordered list of values
/// - Document: a nested field map
///
/// # Usage
/// ```rust
/// use docmap::common::Value;
///
/// let v: Value = 42.into();
/// assert_eq!(v.as_i32(), Some(42));
/// assert_eq!(Value::from("hello").type_name(), "string");
/// ```
#[derive(Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Represents a null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a signed 32-bit integer value.
    I32(i32),
    /// Represents a signed 64-bit integer value.
    I64(i64),
    /// Represents a 64-bit floating point value.
    F64(f64),
    /// Represents an exact decimal value.
    Decimal(Decimal),
    /// Represents a string value.
    String(String),
    /// Represents a UTC timestamp.
    DateTime(DateTime<Utc>),
    /// Represents a backend identifier.
    ObjectId(ObjectId),
    /// Represents a UUID.
    Uuid(Uuid),
    /// Represents an array value.
    Array(Vec<Value>),
    /// Represents a document value.
    Document(Document),
}

impl Value {
    /// Short lowercase name of the variant, used in log messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F64(_) => "f64",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::ObjectId(_) => "object_id",
            Value::Uuid(_) => "uuid",
            Value::Array(_) => "array",
            Value::Document(_) => "document",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(i) => Some(*i),
            Value::I32(i) => Some(*i as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<&Decimal> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&String> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<&ObjectId> {
        match self {
            Value::ObjectId(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Value::Uuid(uuid) => Some(uuid),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            Value::ObjectId(id) => write!(f, "{:?}", id),
            Value::Uuid(uuid) => write!(f, "Uuid(\"{}\")", uuid),
            Value::DateTime(dt) => write!(f, "DateTime(\"{}\")", dt.to_rfc3339()),
            Value::Array(array) => f.debug_list().entries(array).finish(),
            Value::Document(doc) => write!(f, "{:?}", doc),
            other => write!(f, "{}", other),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I32(i) => write!(f, "{}", i),
            Value::I64(i) => write!(f, "{}", i),
            Value::F64(x) => write!(f, "{}", x),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::DateTime(dt) => write!(f, "\"{}\"", dt.to_rfc3339()),
            Value::ObjectId(id) => write!(f, "ObjectId(\"{}\")", id),
            Value::Uuid(uuid) => write!(f, "\"{}\"", uuid),
            Value::Array(array) => write!(f, "[{}]", array.iter().join(", ")),
            Value::Document(doc) => write!(f, "{}", doc),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<ObjectId> for Value {
    fn from(value: ObjectId) -> Self {
        Value::ObjectId(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
