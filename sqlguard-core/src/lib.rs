//! sqlguard-core: SQL anti-pattern analysis engine
//!
//! This crate provides the analysis pipeline:
//! - Classifier: file discovery and candidate classification
//! - Extract: SQL snippet extraction plus structural ORM-risk candidates
//! - Validate: syntactic validation against a SQL grammar
//! - Detect: a fixed catalog of independent, severity-classified rules
//! - Report: aggregation and machine/human renderings
//! - Pipeline: concurrent orchestration, run state machine, persistence
//! - Events: structured lifecycle emission for embedders
//! - Stores: run-record and artifact-store trait surface

pub mod classifier;
pub mod config;
pub mod detect;
pub mod errors;
pub mod events;
pub mod extract;
pub mod pipeline;
pub mod report;
pub mod run;
pub mod stores;
pub mod tracing;
pub mod validate;

// Re-exports for convenience
pub use classifier::{classify, CandidateFile, FileCategory, FileWalker};
pub use config::{AnalysisConfig, AnalysisMode, SqlDialect};
pub use detect::{
    detect, is_test_path, registry, AnalyzedFragment, FileContext, IssueLocation, ReportIssue,
    Rule, Severity, Technique,
};
pub use errors::{AnalysisError, StorageError};
pub use events::{AnalysisEventHandler, EventDispatcher};
pub use extract::{
    extract, Fragment, LineSpan, SqlCandidate, StructuralCandidate, StructuralKind,
};
pub use pipeline::{Analyzer, IoPool, TaskHandle};
pub use report::{build_report, AnalysisReport, FileAnalysis, ReportSummary};
pub use run::{AnalysisRun, ReportLocation, RunStatus};
pub use stores::{ArtifactStore, RunStore};
pub use validate::{ParsedQuery, SyntaxValidator};
