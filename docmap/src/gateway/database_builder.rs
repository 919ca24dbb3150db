use crate::errors::{OdmError, OdmResult};
use crate::gateway::{Database, DatabaseConfig, DatabaseGateway, Endpoint, ReadPreference};

/// Builder for connection settings.
///
/// Configuration errors are captured as they happen and reported when the
/// builder is finished, so calls can be chained without intermediate `?`.
///
/// # Examples
///
/// ```rust
/// use docmap::gateway::memory::MemoryGateway;
/// use docmap::gateway::{Database, ReadPreference};
///
/// let db = Database::builder()
///     .endpoint("localhost:27027")
///     .endpoint("localhost:27028")
///     .database_name("test")
///     .read_preference(ReadPreference::SecondaryPreferred)
///     .connect(MemoryGateway::new())
///     .unwrap();
/// assert!(db.is_connected());
/// ```
#[derive(Default)]
pub struct DatabaseBuilder {
    error: Option<OdmError>,
    config: DatabaseConfig,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        DatabaseBuilder {
            error: None,
            config: DatabaseConfig::default(),
        }
    }

    /// Adds a `host:port` endpoint. Duplicates are ignored.
    pub fn endpoint(mut self, address: &str) -> Self {
        if self.error.is_none() {
            match Endpoint::parse(address) {
                Ok(endpoint) => self.config.add_endpoint(endpoint),
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    pub fn endpoints(self, addresses: &[&str]) -> Self {
        addresses
            .iter()
            .fold(self, |builder, address| builder.endpoint(address))
    }

    pub fn database_name(mut self, database_name: &str) -> Self {
        self.config.set_database_name(database_name);
        self
    }

    pub fn max_connections(mut self, max_connections: usize) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_max_connections(max_connections) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn read_preference(mut self, read_preference: ReadPreference) -> Self {
        self.config.set_read_preference(read_preference);
        self
    }

    /// Finishes the configuration without connecting.
    pub fn build(self) -> OdmResult<DatabaseConfig> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.config.validate()?;
        Ok(self.config)
    }

    /// Creates a new [Database] handle connected through `gateway`.
    pub fn connect<G: DatabaseGateway + 'static>(self, gateway: G) -> OdmResult<Database> {
        let config = self.build()?;
        let database = Database::new();
        database.connect(config, gateway)?;
        Ok(database)
    }

    /// Connects an existing [Database] handle, e.g. [Database::global].
    pub fn connect_to<G: DatabaseGateway + 'static>(self, database: &Database, gateway: G) -> OdmResult<()> {
        let config = self.build()?;
        database.connect(config, gateway)
    }
}
