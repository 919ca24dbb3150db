use crate::common::Value;
use crate::errors::{OdmError, OdmResult};

/// The outcome of one asynchronous gateway operation.
///
/// A completion carries a result, an error, or neither: backend failures are
/// delivered here next to whatever partial result exists instead of being
/// returned as `Err` from the persistence call. A completion with neither
/// part is a *skipped* operation, such as an update with nothing to write.
///
/// # Examples
///
/// ```rust
/// use docmap::errors::{ErrorKind, OdmError};
/// use docmap::gateway::{Completion, WriteResult};
///
/// let ok = Completion::success(WriteResult::new(1, vec![]));
/// assert!(ok.is_ok());
///
/// let failed: Completion<WriteResult> =
///     Completion::failure(OdmError::new("network fault", ErrorKind::BackendError));
/// let (result, error) = failed.into_parts();
/// assert!(result.is_none());
/// assert_eq!(error.unwrap().message(), "network fault");
/// ```
#[derive(Debug)]
pub struct Completion<T> {
    result: Option<T>,
    error: Option<OdmError>,
}

impl<T> Completion<T> {
    pub fn success(result: T) -> Self {
        Completion {
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: OdmError) -> Self {
        Completion {
            result: None,
            error: Some(error),
        }
    }

    /// A failure that still carries the part of the result the backend produced.
    pub fn partial(result: T, error: OdmError) -> Self {
        Completion {
            result: Some(result),
            error: Some(error),
        }
    }

    /// An operation that completed without reaching the backend.
    pub fn skipped() -> Self {
        Completion {
            result: None,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_skipped(&self) -> bool {
        self.result.is_none() && self.error.is_none()
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&OdmError> {
        self.error.as_ref()
    }

    /// Splits into the `(result, error)` pair.
    pub fn into_parts(self) -> (Option<T>, Option<OdmError>) {
        (self.result, self.error)
    }

    /// Collapses into a `Result`, dropping any partial result on error.
    pub fn into_result(self) -> OdmResult<Option<T>> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Completion<U> {
        Completion {
            result: self.result.map(f),
            error: self.error,
        }
    }
}

/// What the backend acknowledged for a write.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteResult {
    ack_count: u64,
    affected_ids: Vec<Value>,
}

impl WriteResult {
    pub fn new(ack_count: u64, affected_ids: Vec<Value>) -> Self {
        Self {
            ack_count,
            affected_ids,
        }
    }

    /// Number of documents the backend reports as written or removed.
    pub fn ack_count(&self) -> u64 {
        self.ack_count
    }

    /// Identities of the documents touched, including ids the backend assigned.
    pub fn affected_ids(&self) -> &[Value] {
        &self.affected_ids
    }
}
