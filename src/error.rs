//! Unified error handling for the proffy crate
//!
//! The two core operations each have their own error type, chosen so that a
//! transport layer can map them to status codes without inspecting storage
//! details:
//!
//! - [`SearchError`] - raised by the availability matcher
//! - [`RegistrationError`] - raised by the registration coordinator
//! - [`Error`] - crate-level enum wrapping both plus configuration and I/O
//!
//! # Usage
//!
//! ```rust,ignore
//! use proffy::error::{Error, ErrorCategory};
//!
//! fn handle_error(err: Error) {
//!     if err.category() == ErrorCategory::Input {
//!         eprintln!("Bad request: {err}");
//!     }
//! }
//! ```

use std::io;
use thiserror::Error;

pub use crate::schedule::ScheduleError;
pub use crate::storage::StoreError;

/// Errors from availability searches
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A filter is missing or cannot be parsed; no query was issued
    #[error("invalid search filter '{field}': {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// The store could not answer; cause is logged, not carried
    #[error("availability search could not be completed")]
    QueryFailed,
}

impl SearchError {
    pub(crate) fn missing(field: &'static str) -> Self {
        Self::InvalidInput {
            field,
            reason: "required filter is missing".to_string(),
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl ToString) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.to_string(),
        }
    }
}

/// Errors from tutor registration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Request rejected before any transaction was opened
    #[error("invalid registration: {reason}")]
    Validation { reason: String },

    /// Transactional insert failed and was rolled back
    ///
    /// Deliberately carries no storage detail.
    #[error("tutor registration failed")]
    RegistrationFailed,
}

impl RegistrationError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Caller supplied bad input
    Input,
    /// Storage and I/O errors
    Storage,
    /// Configuration and validation errors
    Config,
}

/// Unified error type for the proffy crate
#[derive(Error, Debug)]
pub enum Error {
    /// Availability search errors
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Registration errors
    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// Storage errors outside the two core operations (startup, stats)
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this error is recoverable (can be retried)
    ///
    /// Nothing in the core retries; this is advice for callers.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Search(SearchError::QueryFailed) => true,
            Self::Registration(RegistrationError::RegistrationFailed) => true,
            Self::Store(StoreError::Sqlite(_)) => true,
            Self::Io(_) => true,
            Self::Search(_) | Self::Registration(_) | Self::Store(_) => false,
            Self::Json(_) | Self::Config(_) => false,
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Search(SearchError::InvalidInput { .. })
            | Self::Registration(RegistrationError::Validation { .. })
            | Self::Json(_) => ErrorCategory::Input,
            Self::Search(SearchError::QueryFailed)
            | Self::Registration(RegistrationError::RegistrationFailed)
            | Self::Store(_)
            | Self::Io(_) => ErrorCategory::Storage,
            Self::Config(_) => ErrorCategory::Config,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let err: Error = SearchError::missing("subject").into();
        assert_eq!(err.category(), ErrorCategory::Input);

        let err: Error = RegistrationError::RegistrationFailed.into();
        assert_eq!(err.category(), ErrorCategory::Storage);

        let err: Error = RegistrationError::validation("no slots").into();
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::from(SearchError::QueryFailed).is_recoverable());
        assert!(!Error::from(SearchError::missing("time")).is_recoverable());
        assert!(!Error::from(StoreError::LockPoisoned).is_recoverable());
    }

    #[test]
    fn test_registration_failed_hides_detail() {
        assert_eq!(
            RegistrationError::RegistrationFailed.to_string(),
            "tutor registration failed"
        );
    }

    #[test]
    fn test_invalid_input_message() {
        let err = SearchError::invalid("week_day", "expected an integer");
        assert_eq!(
            err.to_string(),
            "invalid search filter 'week_day': expected an integer"
        );
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("Invalid bind address");
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(!err.is_recoverable());
    }
}
