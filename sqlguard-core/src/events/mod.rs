//! Event system for the analysis pipeline.
//! Trait with no-op defaults, synchronous dispatch, zero overhead when empty.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::AnalysisEventHandler;
pub use types::{
    FileAnalyzedEvent, FileSkippedEvent, FilesDiscoveredEvent, IssueCounts, ReportPersistedEvent,
    RunCompletedEvent, RunFailedEvent, RunStartedEvent,
};
