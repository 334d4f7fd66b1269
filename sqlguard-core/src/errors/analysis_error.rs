//! Pipeline errors.

use std::path::PathBuf;

use uuid::Uuid;

use crate::run::RunStatus;

use super::StorageError;

/// Errors that abort an analysis run.
///
/// Per-file read failures are not represented here: they are logged and the
/// file is skipped. Everything below transitions the run to FAILED.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("dynamic analysis is not implemented")]
    UnsupportedMode,

    #[error("run not found: {id}")]
    RunNotFound { id: Uuid },

    #[error("no candidate files found under {}", root.display())]
    NoCandidateFiles { root: PathBuf },

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid run status transition: {from} -> {to}")]
    InvalidTransition { from: RunStatus, to: RunStatus },

    #[error("report serialization failed: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },

    #[error("persistence task failed: {message}")]
    TaskFailed { message: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
