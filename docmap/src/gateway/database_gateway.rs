use crate::common::Document;
use crate::errors::OdmResult;
use crate::gateway::{Completion, DatabaseConfig, Query, UpdateOptions, WriteResult};
use async_trait::async_trait;

/// A lazy sequence of raw documents returned by a query.
pub type RawCursor = Box<dyn Iterator<Item = Document> + Send>;

/// Executes wire operations against a document store.
///
/// Implementations own the protocol, connection pooling and topology
/// handling. Every `execute_*` call reports its outcome through a
/// [Completion]; implementations never panic or return early on a backend
/// failure.
#[async_trait]
pub trait DatabaseGateway: Send + Sync {
    /// Called once when the owning [crate::gateway::Database] connects.
    fn open(&self, _config: &DatabaseConfig) -> OdmResult<()> {
        Ok(())
    }

    /// Called once when the owning [crate::gateway::Database] disconnects.
    fn close(&self) -> OdmResult<()> {
        Ok(())
    }

    async fn execute_insert(&self, collection_name: &str, document: Document) -> Completion<WriteResult>;

    async fn execute_update(
        &self,
        collection_name: &str,
        identity_query: &Query,
        document: Document,
        options: &UpdateOptions,
    ) -> Completion<WriteResult>;

    async fn execute_delete(&self, collection_name: &str, query: &Query) -> Completion<WriteResult>;

    /// Runs a query. With `single` at most one document is returned.
    async fn execute_query(&self, collection_name: &str, query: &Query, single: bool) -> Completion<RawCursor>;
}
