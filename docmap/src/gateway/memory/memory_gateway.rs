use crate::common::{Document, ObjectId, Value, DOC_ID};
use crate::errors::{ErrorKind, OdmError};
use crate::gateway::{
    Completion, DatabaseConfig, DatabaseGateway, Query, RawCursor, UpdateOptions, WriteResult,
};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;

/// A complete in-memory gateway.
///
/// Collections are stored per `database.collection` namespace in insertion
/// order. The gateway behaves like a document server for the operations the
/// mapping layer issues:
///
/// - insert assigns an [ObjectId] `_id` when the document has none and
///   rejects a duplicate `_id` with [ErrorKind::WriteConflict]
/// - a forced update replaces the stored document but keeps its `_id`,
///   otherwise the given keys are merged into it
/// - update and delete acknowledge `0` when nothing matches
///
/// [MemoryGateway::fail_next] makes the next operation fail with the given
/// kind, and [MemoryGateway::with_latency] delays every operation.
///
/// # Examples
///
/// ```rust
/// use docmap::doc;
/// use docmap::gateway::memory::MemoryGateway;
/// use docmap::gateway::DatabaseGateway;
///
/// # tokio_test_block(async {
/// let gateway = MemoryGateway::new();
/// let completion = gateway.execute_insert("users", doc! { name: "Alice" }).await;
/// assert_eq!(completion.result().unwrap().ack_count(), 1);
/// assert_eq!(gateway.documents("users").len(), 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MemoryGateway {
    inner: Arc<MemoryGatewayInner>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        MemoryGateway {
            inner: Arc::new(MemoryGatewayInner::default()),
        }
    }

    /// Creates a gateway that sleeps for `latency` before every operation.
    pub fn with_latency(latency: Duration) -> Self {
        let gateway = MemoryGateway::new();
        *gateway.inner.latency.write() = Some(latency);
        gateway
    }

    /// Makes the next operation complete with an error of `kind`.
    pub fn fail_next(&self, kind: ErrorKind) {
        *self.inner.pending_failure.lock() = Some(kind);
    }

    /// Snapshot of the documents stored in `collection_name`.
    pub fn documents(&self, collection_name: &str) -> Vec<Document> {
        let namespace = self.inner.namespace(collection_name);
        self.inner
            .collections
            .get(&namespace)
            .map(|docs| docs.value().clone())
            .unwrap_or_default()
    }

    /// The `database.collection` namespaces holding data, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names = self
            .inner
            .collections
            .iter()
            .map(|entry| entry.key().clone())
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    /// Drops every stored document.
    pub fn clear(&self) {
        self.inner.collections.clear();
    }
}

#[async_trait]
impl DatabaseGateway for MemoryGateway {
    fn open(&self, config: &DatabaseConfig) -> crate::errors::OdmResult<()> {
        *self.inner.database_name.write() = config.database_name().to_string();
        log::debug!("Memory gateway opened for database '{}'", config.database_name());
        Ok(())
    }

    fn close(&self) -> crate::errors::OdmResult<()> {
        log::debug!("Memory gateway closed");
        Ok(())
    }

    async fn execute_insert(&self, collection_name: &str, document: Document) -> Completion<WriteResult> {
        if let Some(error) = self.inner.before_operation().await {
            return Completion::failure(error);
        }
        self.inner.insert(collection_name, document)
    }

    async fn execute_update(
        &self,
        collection_name: &str,
        identity_query: &Query,
        document: Document,
        options: &UpdateOptions,
    ) -> Completion<WriteResult> {
        if let Some(error) = self.inner.before_operation().await {
            return Completion::failure(error);
        }
        self.inner.update(collection_name, identity_query, document, options)
    }

    async fn execute_delete(&self, collection_name: &str, query: &Query) -> Completion<WriteResult> {
        if let Some(error) = self.inner.before_operation().await {
            return Completion::failure(error);
        }
        self.inner.delete(collection_name, query)
    }

    async fn execute_query(&self, collection_name: &str, query: &Query, single: bool) -> Completion<RawCursor> {
        if let Some(error) = self.inner.before_operation().await {
            return Completion::failure(error);
        }
        let documents = self.inner.query(collection_name, query, single);
        Completion::success(Box::new(documents.into_iter()))
    }
}

#[derive(Default)]
struct MemoryGatewayInner {
    database_name: RwLock<String>,
    collections: DashMap<String, Vec<Document>>,
    pending_failure: Mutex<Option<ErrorKind>>,
    latency: RwLock<Option<Duration>>,
}

impl MemoryGatewayInner {
    fn namespace(&self, collection_name: &str) -> String {
        format!("{}.{}", self.database_name.read(), collection_name)
    }

    // no lock may be held across the sleep
    async fn before_operation(&self) -> Option<OdmError> {
        let latency = *self.latency.read();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let kind = self.pending_failure.lock().take()?;
        log::error!("Injected {} in memory gateway", kind);
        Some(OdmError::new(&format!("Injected {}", kind), kind))
    }

    fn insert(&self, collection_name: &str, document: Document) -> Completion<WriteResult> {
        let id = document
            .id()
            .cloned()
            .unwrap_or_else(|| Value::ObjectId(ObjectId::new()));

        let mut stored = Document::new();
        stored.put(DOC_ID, id.clone());
        for (key, value) in document {
            if key != DOC_ID {
                stored.put(key, value);
            }
        }

        let namespace = self.namespace(collection_name);
        let mut docs = self.collections.entry(namespace.clone()).or_default();
        if docs.iter().any(|doc| doc.id() == Some(&id)) {
            log::error!("Duplicate _id {} in {}", id, namespace);
            return Completion::failure(OdmError::new(
                &format!("Duplicate _id {} in {}", id, namespace),
                ErrorKind::WriteConflict,
            ));
        }

        docs.push(stored);
        Completion::success(WriteResult::new(1, vec![id]))
    }

    fn update(
        &self,
        collection_name: &str,
        identity_query: &Query,
        document: Document,
        options: &UpdateOptions,
    ) -> Completion<WriteResult> {
        let namespace = self.namespace(collection_name);
        let Some(mut docs) = self.collections.get_mut(&namespace) else {
            return Completion::success(WriteResult::new(0, vec![]));
        };

        let Some(target) = docs.iter_mut().find(|doc| identity_query.matches(doc)) else {
            return Completion::success(WriteResult::new(0, vec![]));
        };

        let id = target.id().cloned().unwrap_or_default();
        if options.is_force_full_replace() {
            let mut replacement = Document::new();
            replacement.put(DOC_ID, id.clone());
            for (key, value) in document {
                if key != DOC_ID {
                    replacement.put(key, value);
                }
            }
            *target = replacement;
        } else {
            for (key, value) in document {
                if key != DOC_ID {
                    target.put(key, value);
                }
            }
        }

        Completion::success(WriteResult::new(1, vec![id]))
    }

    fn delete(&self, collection_name: &str, query: &Query) -> Completion<WriteResult> {
        let namespace = self.namespace(collection_name);
        let Some(mut docs) = self.collections.get_mut(&namespace) else {
            return Completion::success(WriteResult::new(0, vec![]));
        };

        let mut removed = Vec::new();
        docs.retain(|doc| {
            if query.matches(doc) {
                removed.push(doc.id().cloned().unwrap_or_default());
                false
            } else {
                true
            }
        });

        Completion::success(WriteResult::new(removed.len() as u64, removed))
    }

    fn query(&self, collection_name: &str, query: &Query, single: bool) -> Vec<Document> {
        let namespace = self.namespace(collection_name);
        let Some(docs) = self.collections.get(&namespace) else {
            return Vec::new();
        };

        let matching = docs.iter().filter(|doc| query.matches(doc)).cloned();
        if single {
            matching.take(1).collect()
        } else {
            matching.collect()
        }
    }
}
