// doc constants
pub const DOC_ID: &str = "_id";

// connection constants
pub const NOT_CONNECTED: &str = "you must be connect";
pub const DEFAULT_MAX_CONNECTIONS: usize = 10;

// registry constants
pub const ROOT_DEPTH: usize = 0;

pub const DOCMAP_VERSION: &str = env!("CARGO_PKG_VERSION");
