//! Storage errors.

use uuid::Uuid;

/// Errors surfaced by run-record and artifact stores.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("migration {version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("run record not found: {id}")]
    NotFound { id: Uuid },
}
