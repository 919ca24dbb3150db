use crate::common::DEFAULT_MAX_CONNECTIONS;
use crate::errors::{ErrorKind, OdmError, OdmResult};
use std::fmt::Display;

/// One `host:port` address of a database node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(host: &str, port: u16) -> Self {
        Endpoint {
            host: host.to_string(),
            port,
        }
    }

    /// Parses `host:port`.
    pub fn parse(address: &str) -> OdmResult<Self> {
        let (host, port) = address.rsplit_once(':').ok_or_else(|| {
            log::error!("Endpoint {:?} is not in host:port form", address);
            OdmError::new(
                &format!("Endpoint {:?} is not in host:port form", address),
                ErrorKind::InvalidConfiguration,
            )
        })?;

        if host.is_empty() {
            log::error!("Endpoint {:?} has an empty host", address);
            return Err(OdmError::new(
                &format!("Endpoint {:?} has an empty host", address),
                ErrorKind::InvalidConfiguration,
            ));
        }

        let port = port.parse::<u16>()?;
        Ok(Endpoint::new(host, port))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Which replica-set members reads may be served from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadPreference {
    #[default]
    Primary,
    PrimaryPreferred,
    Secondary,
    SecondaryPreferred,
}

/// Connection settings handed to a [crate::gateway::DatabaseGateway] on connect.
///
/// # Examples
///
/// ```rust
/// use docmap::gateway::DatabaseConfig;
///
/// let config = DatabaseConfig::new(&["localhost:27027", "localhost:27028"], "test").unwrap();
/// assert_eq!(config.endpoints().len(), 2);
/// assert_eq!(config.database_name(), "test");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    endpoints: Vec<Endpoint>,
    database_name: String,
    max_connections: usize,
    read_preference: ReadPreference,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            endpoints: Vec::new(),
            database_name: String::new(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            read_preference: ReadPreference::default(),
        }
    }
}

impl DatabaseConfig {
    /// Builds a validated configuration from `host:port` strings.
    pub fn new(addresses: &[&str], database_name: &str) -> OdmResult<Self> {
        let endpoints = addresses
            .iter()
            .map(|address| Endpoint::parse(address))
            .collect::<OdmResult<Vec<_>>>()?;

        let config = DatabaseConfig {
            endpoints,
            database_name: database_name.to_string(),
            ..DatabaseConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    pub fn read_preference(&self) -> ReadPreference {
        self.read_preference
    }

    pub(crate) fn add_endpoint(&mut self, endpoint: Endpoint) {
        if !self.endpoints.contains(&endpoint) {
            self.endpoints.push(endpoint);
        }
    }

    pub(crate) fn set_database_name(&mut self, database_name: &str) {
        self.database_name = database_name.to_string();
    }

    pub(crate) fn set_max_connections(&mut self, max_connections: usize) -> OdmResult<()> {
        if max_connections == 0 {
            log::error!("Max connections must be greater than zero");
            return Err(OdmError::new(
                "Max connections must be greater than zero",
                ErrorKind::InvalidConfiguration,
            ));
        }
        self.max_connections = max_connections;
        Ok(())
    }

    pub(crate) fn set_read_preference(&mut self, read_preference: ReadPreference) {
        self.read_preference = read_preference;
    }

    /// Checks that at least one endpoint and a database name are present.
    pub fn validate(&self) -> OdmResult<()> {
        if self.endpoints.is_empty() {
            log::error!("At least one endpoint is required");
            return Err(OdmError::new(
                "At least one endpoint is required",
                ErrorKind::InvalidConfiguration,
            ));
        }

        if self.database_name.is_empty() {
            log::error!("Database name cannot be empty");
            return Err(OdmError::new(
                "Database name cannot be empty",
                ErrorKind::InvalidConfiguration,
            ));
        }

        Ok(())
    }
}
