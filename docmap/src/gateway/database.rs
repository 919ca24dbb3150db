use crate::errors::{ErrorKind, OdmError, OdmResult};
use crate::gateway::{DatabaseBuilder, DatabaseConfig, DatabaseGateway};
use crate::GLOBAL_DATABASE;
use parking_lot::RwLock;
use std::sync::Arc;

/// The connection handle every persistence and query call goes through.
///
/// `Database` uses the PIMPL pattern: clones share one `Arc<DatabaseInner>`,
/// so an entity type declared against a handle sees connects and disconnects
/// made through any clone of it. The process-wide handle returned by
/// [Database::global] is what entity types use unless declared otherwise.
///
/// While disconnected, [Database::gateway] fails with
/// [ErrorKind::NotConnected] and the message `you must be connect`.
///
/// # Examples
///
/// ```rust
/// use docmap::gateway::{Database, DatabaseConfig};
/// use docmap::gateway::memory::MemoryGateway;
///
/// let db = Database::new();
/// assert!(db.gateway().is_err());
///
/// let config = DatabaseConfig::new(&["localhost:27027"], "test").unwrap();
/// db.connect(config, MemoryGateway::new()).unwrap();
/// assert!(db.is_connected());
///
/// db.disconnect().unwrap();
/// assert!(!db.is_connected());
/// ```
#[derive(Clone, Default)]
pub struct Database {
    inner: Arc<DatabaseInner>,
}

impl Database {
    /// Creates a disconnected handle.
    pub fn new() -> Self {
        Database {
            inner: Arc::new(DatabaseInner::new()),
        }
    }

    /// The process-wide handle.
    pub fn global() -> Database {
        GLOBAL_DATABASE.clone()
    }

    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    /// Connects through `gateway`. Fails if this handle is already connected.
    pub fn connect<G: DatabaseGateway + 'static>(&self, config: DatabaseConfig, gateway: G) -> OdmResult<()> {
        self.inner.connect(config, Arc::new(gateway))
    }

    /// Connects through a gateway that is shared with the caller.
    pub fn connect_shared(&self, config: DatabaseConfig, gateway: Arc<dyn DatabaseGateway>) -> OdmResult<()> {
        self.inner.connect(config, gateway)
    }

    /// Closes the gateway and drops the connection. A failed close leaves
    /// the handle connected.
    pub fn disconnect(&self) -> OdmResult<()> {
        self.inner.disconnect()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    /// The active configuration, or `None` while disconnected.
    pub fn config(&self) -> Option<DatabaseConfig> {
        self.inner.config()
    }

    /// The active gateway.
    pub fn gateway(&self) -> OdmResult<Arc<dyn DatabaseGateway>> {
        self.inner.gateway()
    }

    /// Returns true when both handles share the same connection state.
    pub fn same_as(&self, other: &Database) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("connected", &self.is_connected())
            .field("config", &self.config())
            .finish()
    }
}

struct Connection {
    config: DatabaseConfig,
    gateway: Arc<dyn DatabaseGateway>,
}

#[derive(Default)]
struct DatabaseInner {
    connection: RwLock<Option<Connection>>,
}

impl DatabaseInner {
    fn new() -> Self {
        DatabaseInner {
            connection: RwLock::new(None),
        }
    }

    fn connect(&self, config: DatabaseConfig, gateway: Arc<dyn DatabaseGateway>) -> OdmResult<()> {
        config.validate()?;

        let mut connection = self.connection.write();
        if connection.is_some() {
            log::error!("Database is already connected");
            return Err(OdmError::new(
                "Database is already connected",
                ErrorKind::InvalidOperation,
            ));
        }

        gateway.open(&config)?;
        log::info!(
            "Connected to database '{}' at {}",
            config.database_name(),
            config
                .endpoints()
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        *connection = Some(Connection { config, gateway });
        Ok(())
    }

    fn disconnect(&self) -> OdmResult<()> {
        let mut connection = self.connection.write();
        match connection.as_ref() {
            Some(active) => {
                active.gateway.close()?;
                log::info!("Disconnected from database '{}'", active.config.database_name());
                *connection = None;
                Ok(())
            }
            None => {
                log::error!("Disconnect called on a database that is not connected");
                Err(OdmError::not_connected())
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connection.read().is_some()
    }

    fn config(&self) -> Option<DatabaseConfig> {
        self.connection.read().as_ref().map(|c| c.config.clone())
    }

    fn gateway(&self) -> OdmResult<Arc<dyn DatabaseGateway>> {
        match self.connection.read().as_ref() {
            Some(active) => Ok(active.gateway.clone()),
            None => {
                log::error!("{}", crate::NOT_CONNECTED);
                Err(OdmError::not_connected())
            }
        }
    }
}
