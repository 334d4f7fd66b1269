//! Classifier types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Category assigned to an analysis candidate; drives extractor dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Sql,
    Code,
    Config,
}

/// A file selected for analysis.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Absolute, deduplicated path.
    pub path: PathBuf,
    pub category: FileCategory,
}
