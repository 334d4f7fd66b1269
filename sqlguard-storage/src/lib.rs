//! sqlguard-storage: reference persistence backends for the analysis engine.
//!
//! - `SqliteRunStore`: run records in SQLite (WAL, STRICT schema,
//!   `user_version` migrations)
//! - `FsArtifactStore`: report artifacts on the filesystem with signed,
//!   expiring read URLs

pub mod artifact_store;
pub mod connection;
pub mod migrations;
pub mod run_store;

pub use artifact_store::FsArtifactStore;
pub use run_store::SqliteRunStore;
