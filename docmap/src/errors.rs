use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};
use crate::NOT_CONNECTED;

/// Error kinds for docmap operations.
///
/// Kinds fall in two groups. Caller mistakes ([ErrorKind::NotConnected],
/// [ErrorKind::NotIdentifiable], [ErrorKind::TypeNotRegistered],
/// [ErrorKind::InvalidConfiguration], [ErrorKind::InvalidOperation]) are
/// returned synchronously as `Err`. Backend conditions
/// ([ErrorKind::BackendError], [ErrorKind::WriteConflict]) travel inside a
/// [crate::gateway::Completion] next to the result.
///
/// # Examples
///
/// ```rust
/// use docmap::errors::{ErrorKind, OdmError, OdmResult};
///
/// fn example() -> OdmResult<()> {
///     Err(OdmError::new("entity type not registered", ErrorKind::TypeNotRegistered))
/// }
///
/// assert!(example().is_err());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Connection Errors
    /// No active database connection at call time
    NotConnected,
    /// Connection settings are malformed
    InvalidConfiguration,

    // Identity Errors
    /// An identity-keyed operation was issued on an instance without `_id`
    NotIdentifiable,

    // Declaration Errors
    /// A type name was never registered
    TypeNotRegistered,
    /// The operation is not valid in the current context
    InvalidOperation,

    // Backend Errors
    /// Generic failure reported by the database gateway
    BackendError,
    /// A write collided with an existing document
    WriteConflict,

    // Data Errors
    /// A value could not be mapped to or from its stored form
    ObjectMappingError,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotConnected => write!(f, "Database error"),
            ErrorKind::InvalidConfiguration => write!(f, "Invalid configuration"),
            ErrorKind::NotIdentifiable => write!(f, "Not identifiable"),
            ErrorKind::TypeNotRegistered => write!(f, "Type not registered"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::WriteConflict => write!(f, "Write conflict"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom docmap error type.
///
/// `OdmError` carries a message, an [ErrorKind], an optional cause and the
/// backtrace captured where it was raised.
///
/// # Examples
///
/// ```rust
/// use docmap::errors::{ErrorKind, OdmError};
///
/// let cause = OdmError::new("socket closed", ErrorKind::BackendError);
/// let err = OdmError::new_with_cause("update failed", ErrorKind::BackendError, cause);
/// assert_eq!(err.message(), "update failed");
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct OdmError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<OdmError>>,
    backtrace: Atomic<Backtrace>,
}

impl OdmError {
    /// Creates a new `OdmError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        OdmError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `OdmError` wrapping an underlying cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: OdmError) -> Self {
        OdmError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// The error raised by every persistence or query call issued while no
    /// database connection is active.
    pub fn not_connected() -> Self {
        OdmError::new(NOT_CONNECTED, ErrorKind::NotConnected)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&OdmError> {
        self.cause.as_deref()
    }

    /// Returns true when the error was raised because no connection was active.
    pub fn is_connection_error(&self) -> bool {
        self.error_kind == ErrorKind::NotConnected
    }
}

impl Display for OdmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for OdmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}: {}\nCaused by: {:?}", self.error_kind, self.message, cause),
            None => write!(f, "{}: {}\n{:?}", self.error_kind, self.message, self.backtrace.read()),
        }
    }
}

impl Error for OdmError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for docmap operations.
pub type OdmResult<T> = Result<T, OdmError>;

impl From<std::num::ParseIntError> for OdmError {
    fn from(err: std::num::ParseIntError) -> Self {
        OdmError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::InvalidConfiguration,
        )
    }
}

impl From<String> for OdmError {
    fn from(msg: String) -> Self {
        OdmError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for OdmError {
    fn from(msg: &str) -> Self {
        OdmError::new(msg, ErrorKind::InternalError)
    }
}
