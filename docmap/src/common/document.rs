use crate::common::{Value, DOC_ID};
use indexmap::map::{IntoIter, Iter};
use indexmap::IndexMap;
use itertools::Itertools;
use std::fmt::{Debug, Display, Formatter};

/// An insertion-ordered map of field name to [Value].
///
/// `Document` is the raw record shape exchanged with the database gateway.
/// Keys keep the order in which they were first inserted, so a document
/// rendered from a schema lists ancestor fields first, then each level's
/// declared fields.
///
/// # Examples
///
/// ```rust
/// use docmap::doc;
/// use docmap::common::Value;
///
/// let doc = doc! { name: "Alice", age: 30 };
/// assert_eq!(doc.get("age"), Some(&Value::I32(30)));
/// assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["name", "age"]);
/// ```
#[derive(Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates `value` with `key`. An existing key keeps its position.
    pub fn put<T: Into<Value>>(&mut self, key: impl Into<String>, value: T) {
        self.data.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Removes `key`, preserving the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Returns the `_id` value if present.
    pub fn id(&self) -> Option<&Value> {
        self.data.get(DOC_ID)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.data.iter()
    }

    /// Copies every entry of `other` into this document, overwriting shared keys.
    pub fn merge(&mut self, other: &Document) {
        for (key, value) in other.iter() {
            self.data.insert(key.clone(), value.clone());
        }
    }

    /// Returns true if every key of `filter` is present here with an equal value.
    pub fn matches(&self, filter: &Document) -> bool {
        filter
            .iter()
            .all(|(key, value)| self.data.get(key) == Some(value))
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.data.iter()).finish()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.data
                .iter()
                .map(|(key, value)| format!("\"{}\": {}", key, value))
                .join(", ")
        )
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (key, value) in iter {
            doc.put(key, value);
        }
        doc
    }
}

pub fn normalize(value: &str) -> String {
    value.trim_matches('"').to_string()
}

/// Creates a [Document] with JSON-like syntax.
///
/// Values are single token trees: literals, identifiers, parenthesized
/// expressions, nested `{ ... }` documents or `[ ... ]` arrays.
///
/// # Examples
///
/// ```rust
/// use docmap::doc;
///
/// let empty = doc!{};
/// assert!(empty.is_empty());
///
/// let nested = doc!{
///     "string_attr": "string_attr",
///     list_attr: [1, 2, 3],
///     object_attr: { chave: "valor" },
///     computed: (1 + 2),
/// };
/// assert_eq!(nested.size(), 4);
/// ```
#[macro_export]
macro_rules! doc {
    ({}) => {
        $crate::common::Document::new()
    };

    () => {
        $crate::common::Document::new()
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::doc!($($key : $value),*)
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            let mut doc = $crate::common::Document::new();
            $(
                doc.put($crate::common::normalize(stringify!($key)), $crate::doc_value!($value));
            )*
            doc
        }
    };
}

/// Helper macro to convert values for the doc! macro.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
