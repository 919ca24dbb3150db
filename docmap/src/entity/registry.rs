use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::entity::EntityType;
use crate::errors::{ErrorKind, OdmError, OdmResult};
use crate::GLOBAL_REGISTRY;
use indexmap::IndexMap;

/// Maps entity type names to declarations.
///
/// Registration happens when an entity type is declared; lookups after that
/// are read-only. [TypeRegistry::resolve] returns the most-derived registered
/// descendant of the named type, so a name can be used before its subtypes
/// exist and still reach them once they do.
///
/// Clones share the same entries. [TypeRegistry::global] is the process-wide
/// registry; tests usually create their own with [TypeRegistry::new].
///
/// # Examples
///
/// ```rust
/// use docmap::entity::{EntityType, TypeRegistry};
///
/// let registry = TypeRegistry::new();
/// let base = EntityType::builder("CollectionTest").register(&registry).unwrap();
/// let child = EntityType::builder("ChildCollectionTest")
///     .extends(&base)
///     .register(&registry)
///     .unwrap();
///
/// assert_eq!(registry.resolve("CollectionTest").unwrap(), child);
/// assert_eq!(registry.get("CollectionTest"), Some(base));
/// ```
#[derive(Clone, Default)]
pub struct TypeRegistry {
    entries: Atomic<IndexMap<String, EntityType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry {
            entries: atomic(IndexMap::new()),
        }
    }

    /// The process-wide registry.
    pub fn global() -> TypeRegistry {
        GLOBAL_REGISTRY.clone()
    }

    /// Registers `entity_type` under its name.
    ///
    /// Re-declaring a name replaces only that name's entry and moves it to
    /// the end of the registration order.
    pub fn register(&self, entity_type: EntityType) {
        let name = entity_type.name().to_string();
        self.entries.write_with(|entries| {
            if entries.shift_remove(&name).is_some() {
                log::warn!("Entity type {} re-declared, replacing previous declaration", name);
            }
            log::debug!("Registered entity type {}", name);
            entries.insert(name, entity_type);
        });
    }

    /// The entity type registered under exactly `name`.
    pub fn get(&self, name: &str) -> Option<EntityType> {
        self.entries.read_with(|entries| entries.get(name).cloned())
    }

    /// Resolves `name` to its most-derived registered descendant.
    ///
    /// Among all registered types descending from (or equal to) the named
    /// type, the deepest wins; between equally deep candidates the most
    /// recently registered wins.
    pub fn resolve(&self, name: &str) -> OdmResult<EntityType> {
        self.entries.read_with(|entries| {
            let base = entries.get(name).ok_or_else(|| {
                log::error!("Entity type {} is not registered", name);
                OdmError::new(
                    &format!("Entity type {} is not registered", name),
                    ErrorKind::TypeNotRegistered,
                )
            })?;

            let resolved = entries
                .values()
                .filter(|candidate| candidate.is_subtype_of(base))
                .fold(base, |best, candidate| {
                    if candidate.depth() >= best.depth() {
                        candidate
                    } else {
                        best
                    }
                });
            Ok(resolved.clone())
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.read_with(|entries| entries.contains_key(name))
    }

    /// Registered names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries.read_with(|entries| entries.keys().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.entries.read_with(|entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
