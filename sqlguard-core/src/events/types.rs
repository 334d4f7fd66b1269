//! Event payloads emitted by the orchestrator.

use uuid::Uuid;

use crate::config::AnalysisMode;
use crate::run::ReportLocation;

/// Issue counters carried by completion events.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueCounts {
    pub total: usize,
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

#[derive(Debug, Clone)]
pub struct RunStartedEvent {
    pub run_id: Uuid,
    pub mode: AnalysisMode,
}

#[derive(Debug, Clone)]
pub struct FilesDiscoveredEvent {
    pub run_id: Uuid,
    pub candidates: usize,
}

#[derive(Debug, Clone)]
pub struct FileAnalyzedEvent {
    pub run_id: Uuid,
    pub path: String,
    pub fragments: usize,
    pub issues: usize,
}

#[derive(Debug, Clone)]
pub struct FileSkippedEvent {
    pub run_id: Uuid,
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ReportPersistedEvent {
    pub run_id: Uuid,
    pub location: ReportLocation,
}

#[derive(Debug, Clone)]
pub struct RunCompletedEvent {
    pub run_id: Uuid,
    pub counts: IssueCounts,
    pub files_analyzed: usize,
    pub queries_analyzed: usize,
}

#[derive(Debug, Clone)]
pub struct RunFailedEvent {
    pub run_id: Uuid,
    pub reason: String,
}
