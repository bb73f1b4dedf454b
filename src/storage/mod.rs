//! Relational storage for tutors, offerings and schedule slots
//!
//! This module exposes the transaction-scoped store the registration
//! coordinator writes through and the predicate query the availability
//! matcher reads through. SQLite is the production backend; an in-memory
//! mock backs tests.

pub mod repository;

use std::sync::Arc;

use thiserror::Error;

use crate::config::DatabaseConfig;

pub use repository::{
    create_mock_repository, create_sqlite_repository, ClassRepository, FailPoint,
    MockClassRepository, SharedClassRepository, SqliteClassRepository, StoreStats,
    StoreTransaction,
};

/// Errors raised by storage backends
///
/// These stay inside the crate boundary; the matcher and coordinator log them
/// and surface opaque errors to callers.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error while preparing the database location
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A thread panicked while holding the store lock
    #[error("store lock poisoned")]
    LockPoisoned,

    /// Referential or value constraint rejected by the store
    #[error("constraint violated: {0}")]
    Constraint(String),

    /// Failure injected by the mock backend
    #[error("injected failure at {0:?}")]
    Injected(FailPoint),
}

/// Result type for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Open the SQLite repository described by the database configuration
pub fn open_repository(config: &DatabaseConfig) -> StoreResult<SharedClassRepository> {
    let repo = SqliteClassRepository::with_busy_timeout(&config.sqlite_path, config.busy_timeout())?;
    Ok(Arc::new(repo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_repository_creates_file() {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            sqlite_path: dir.path().join("nested").join("proffy.db"),
            busy_timeout_ms: 1000,
        };

        let repo = open_repository(&config).unwrap();
        assert!(config.sqlite_path.exists());
        assert_eq!(repo.stats().unwrap(), StoreStats::default());
    }
}
