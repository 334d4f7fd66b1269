//! Storage trait surface consumed by the orchestrator.
//!
//! Persistence backends live outside the engine; the core only needs
//! "create/load/save a run record" and "persist bytes, mint a signed URL".

pub mod memory;

use std::time::Duration;

use uuid::Uuid;

use crate::config::{AnalysisConfig, AnalysisMode};
use crate::errors::StorageError;
use crate::run::{AnalysisRun, ReportLocation};

/// Run-record store. Single-writer: only the orchestrator saves a run.
pub trait RunStore: Send + Sync {
    /// Creates a STARTED run embedding the configuration.
    fn create(&self, mode: AnalysisMode, config: AnalysisConfig)
        -> Result<AnalysisRun, StorageError>;

    fn load(&self, id: Uuid) -> Result<Option<AnalysisRun>, StorageError>;

    /// Persists the run's current state.
    fn save(&self, run: &AnalysisRun) -> Result<(), StorageError>;
}

/// Artifact (blob) store hosting generated reports.
pub trait ArtifactStore: Send + Sync {
    /// Persists bytes and returns the opaque location handle.
    fn store(&self, bytes: &[u8], content_type: &str) -> Result<ReportLocation, StorageError>;

    /// Mints a time-bounded, signed read URL for a stored artifact.
    fn signed_url(&self, location: &ReportLocation, ttl: Duration)
        -> Result<String, StorageError>;
}
