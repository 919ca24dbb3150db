use crate::common::{ObjectId, Value};
use chrono::Utc;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// The semantic type declared for a field.
///
/// The type decides which raw values a field accepts; see
/// [FieldType::coerce] for the exact table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    ObjectId,
    String,
    DateTime,
    Integer,
    Boolean,
    Float,
    List,
    Object,
    Long,
    Decimal,
    Url,
    Uuid,
    Email,
}

impl FieldType {
    /// Coerces a raw value into this type.
    ///
    /// Returns `None` when the value's shape disagrees with the type; the
    /// caller then leaves the field unset. Strings are never parsed into
    /// dates or numbers, and url/email/uuid strings are taken verbatim.
    /// `Null` is accepted by every type.
    pub fn coerce(&self, value: Value) -> Option<Value> {
        if value.is_null() {
            return Some(Value::Null);
        }

        match (self, value) {
            (FieldType::ObjectId, v @ Value::ObjectId(_)) => Some(v),

            (FieldType::String | FieldType::Url | FieldType::Email, v @ Value::String(_)) => Some(v),

            (FieldType::Uuid, v @ (Value::Uuid(_) | Value::String(_))) => Some(v),

            (FieldType::DateTime, v @ Value::DateTime(_)) => Some(v),

            (FieldType::Boolean, v @ Value::Bool(_)) => Some(v),

            (FieldType::Integer, v @ Value::I32(_)) => Some(v),
            (FieldType::Integer, Value::I64(i)) => i32::try_from(i).ok().map(Value::I32),

            (FieldType::Long, Value::I32(i)) => Some(Value::I64(i as i64)),
            (FieldType::Long, v @ Value::I64(_)) => Some(v),

            (FieldType::Float, v @ Value::F64(_)) => Some(v),
            (FieldType::Float, Value::I32(i)) => Some(Value::F64(i as f64)),
            (FieldType::Float, Value::I64(i)) => Some(Value::F64(i as f64)),

            (FieldType::Decimal, v @ Value::Decimal(_)) => Some(v),
            (FieldType::Decimal, Value::I32(i)) => Some(Value::Decimal(Decimal::from(i))),
            (FieldType::Decimal, Value::I64(i)) => Some(Value::Decimal(Decimal::from(i))),
            (FieldType::Decimal, Value::F64(f)) => Decimal::from_f64(f).map(Value::Decimal),

            (FieldType::List, v @ Value::Array(_)) => Some(v),

            (FieldType::Object, v @ Value::Document(_)) => Some(v),

            _ => None,
        }
    }
}

/// A field's default: either a fixed value cloned into every instance, or a
/// factory invoked once per instance construction.
///
/// Factories are how per-instance defaults such as fresh identifiers are
/// expressed; a `Fixed` value is never shared by reference between instances.
#[derive(Clone)]
pub enum DefaultValue {
    Fixed(Value),
    Factory(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    pub fn fixed<T: Into<Value>>(value: T) -> Self {
        DefaultValue::Fixed(value.into())
    }

    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        DefaultValue::Factory(Arc::new(factory))
    }

    /// A fresh [ObjectId] per instance.
    pub fn new_object_id() -> Self {
        DefaultValue::factory(|| Value::ObjectId(ObjectId::new()))
    }

    /// A fresh random (v4) [Uuid] per instance.
    pub fn new_uuid() -> Self {
        DefaultValue::factory(|| Value::Uuid(Uuid::new_v4()))
    }

    /// The construction time of each instance.
    pub fn now() -> Self {
        DefaultValue::factory(|| Value::DateTime(Utc::now()))
    }

    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Fixed(value) => value.clone(),
            DefaultValue::Factory(factory) => factory(),
        }
    }
}

impl Debug for DefaultValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultValue::Fixed(value) => write!(f, "Fixed({:?})", value),
            DefaultValue::Factory(_) => write!(f, "Factory"),
        }
    }
}

/// Declares one attribute of an entity type: name, semantic type and an
/// optional default. Immutable once the entity type is declared.
///
/// # Examples
///
/// ```rust
/// use docmap::schema::{DefaultValue, FieldDescriptor, FieldType};
///
/// let id = FieldDescriptor::object_id("_id").with_default(DefaultValue::new_object_id());
/// let url = FieldDescriptor::url("base_url_field").with_fixed_default("https://www.test.com");
/// assert_eq!(id.field_type(), FieldType::ObjectId);
/// assert!(url.default_value().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
    default_value: Option<DefaultValue>,
}

impl FieldDescriptor {
    pub fn new(name: &str, field_type: FieldType) -> Self {
        FieldDescriptor {
            name: name.to_string(),
            field_type,
            default_value: None,
        }
    }

    pub fn object_id(name: &str) -> Self {
        FieldDescriptor::new(name, FieldType::ObjectId)
    }

    pub fn string(name: &str) -> Self {
        FieldDescriptor::new(name, FieldType::String)
    }

    pub fn datetime(name: &str) -> Self {
        FieldDescriptor::new(name, FieldType::DateTime)
    }

    pub fn integer(name: &str) -> Self {
        FieldDescriptor::new(name, FieldType::Integer)
    }

    pub fn boolean(name: &str) -> Self {
        FieldDescriptor::new(name, FieldType::Boolean)
    }

    pub fn float(name: &str) -> Self {
        FieldDescriptor::new(name, FieldType::Float)
    }

    pub fn list(name: &str) -> Self {
        FieldDescriptor::new(name, FieldType::List)
    }

    pub fn object(name: &str) -> Self {
        FieldDescriptor::new(name, FieldType::Object)
    }

    pub fn long(name: &str) -> Self {
        FieldDescriptor::new(name, FieldType::Long)
    }

    pub fn decimal(name: &str) -> Self {
        FieldDescriptor::new(name, FieldType::Decimal)
    }

    pub fn url(name: &str) -> Self {
        FieldDescriptor::new(name, FieldType::Url)
    }

    pub fn uuid(name: &str) -> Self {
        FieldDescriptor::new(name, FieldType::Uuid)
    }

    pub fn email(name: &str) -> Self {
        FieldDescriptor::new(name, FieldType::Email)
    }

    pub fn with_default(mut self, default_value: DefaultValue) -> Self {
        self.default_value = Some(default_value);
        self
    }

    /// Shorthand for `with_default(DefaultValue::fixed(value))`.
    pub fn with_fixed_default<T: Into<Value>>(self, value: T) -> Self {
        self.with_default(DefaultValue::fixed(value))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default_value.as_ref()
    }

    /// Runs the default, coerced through this field's type. A default whose
    /// value the type rejects yields `None`.
    pub fn produce_default(&self) -> Option<Value> {
        let value = self.default_value.as_ref()?.produce();
        let coerced = self.field_type.coerce(value);
        if coerced.is_none() {
            log::warn!("Default for field {} does not match type {:?}", self.name, self.field_type);
        }
        coerced
    }

    pub fn coerce(&self, value: Value) -> Option<Value> {
        let type_name = value.type_name();
        let coerced = self.field_type.coerce(value);
        if coerced.is_none() {
            log::debug!(
                "Ignoring {} value for field {} declared as {:?}",
                type_name,
                self.name,
                self.field_type
            );
        }
        coerced
    }
}
