//! Error type shared by hooks, tasks, and executors.
//!
//! Every hook and task reports failure as an [`ExecutorError`]. When the
//! error phase finishes without any hook handling the failure, the executor
//! wraps the original error in a new [`ExecutorError`] tagged with one of the
//! [`ids`] below. The wrapper keeps the original message, so callers can match
//! on the message regardless of how many layers were added.
//!
//! # Example
//!
//! ```
//! use hookchain_executor::error::{ExecutorError, ids};
//!
//! let original = ExecutorError::msg("boom");
//! let wrapped = ExecutorError::wrap(ids::UNKNOWN_SYNC_ERROR, original);
//!
//! assert_eq!(wrapped.to_string(), "boom");
//! assert_eq!(wrapped.id(), Some(ids::UNKNOWN_SYNC_ERROR));
//! assert_eq!(wrapped.original().map(ExecutorError::message), Some("boom"));
//! ```

use core::any::Any;

/// A boxed, thread-safe error usable as the source of an [`ExecutorError`].
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Result type returned by hooks and tasks.
pub type HookResult<T> = Result<T, ExecutorError>;

/// Well-known [`ExecutorError`] ids.
pub mod ids {
    /// Unhandled failure surfaced by a sync executor.
    pub const UNKNOWN_SYNC_ERROR: &str = "UNKNOWN_SYNC_ERROR";
    /// Unhandled failure surfaced by an async executor.
    pub const UNKNOWN_ASYNC_ERROR: &str = "UNKNOWN_ASYNC_ERROR";
    /// A hook or task panicked and `exec_no_error` caught it.
    pub const PANIC: &str = "PANIC";
    /// The lifecycle finished without producing a return value.
    pub const MISSING_RETURN_VALUE: &str = "MISSING_RETURN_VALUE";
}

/// The runtime's uniform error.
///
/// `Display` prints only [`message`](Self::message), never the id or source.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ExecutorError {
    /// Machine-readable code, e.g. [`ids::UNKNOWN_ASYNC_ERROR`].
    id: Option<String>,
    /// Human-readable message.
    message: String,
    /// The error this one was built from, if any.
    #[source]
    source: Option<BoxError>,
}

impl ExecutorError {
    /// Creates an error with an id and a message.
    #[must_use]
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error carrying only a message.
    #[must_use]
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            id: None,
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error from any other error, reusing its message.
    #[must_use]
    pub fn with_source(id: impl Into<String>, source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self {
            id: Some(id.into()),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Wraps an existing `ExecutorError` under a new id.
    ///
    /// The wrapper keeps the original message; the original is available via
    /// [`original`](Self::original).
    #[must_use]
    pub fn wrap(id: impl Into<String>, original: ExecutorError) -> Self {
        Self {
            id: Some(id.into()),
            message: original.message.clone(),
            source: Some(Box::new(original)),
        }
    }

    /// Builds a [`ids::PANIC`] error from a caught panic payload.
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "task panicked".to_string()
        };
        Self::new(ids::PANIC, message)
    }

    /// Returns the error id, if one was assigned.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns `true` if this error carries the given id.
    #[must_use]
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the wrapped `ExecutorError`, if this error was built by [`wrap`](Self::wrap).
    #[must_use]
    pub fn original(&self) -> Option<&ExecutorError> {
        self.source
            .as_deref()
            .and_then(|source| source.downcast_ref::<ExecutorError>())
    }
}

impl From<&str> for ExecutorError {
    fn from(message: &str) -> Self {
        Self::msg(message)
    }
}

impl From<String> for ExecutorError {
    fn from(message: String) -> Self {
        Self::msg(message)
    }
}
