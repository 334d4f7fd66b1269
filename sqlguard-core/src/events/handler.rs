//! AnalysisEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for observing analysis lifecycle events.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about. The trait requires `Send + Sync`
/// because the per-file events fire from worker threads.
pub trait AnalysisEventHandler: Send + Sync {
    // ---- Run Lifecycle ----
    fn on_run_started(&self, _event: &RunStartedEvent) {}
    fn on_run_completed(&self, _event: &RunCompletedEvent) {}
    fn on_run_failed(&self, _event: &RunFailedEvent) {}

    // ---- Discovery & Per-File Analysis ----
    fn on_files_discovered(&self, _event: &FilesDiscoveredEvent) {}
    fn on_file_analyzed(&self, _event: &FileAnalyzedEvent) {}
    fn on_file_skipped(&self, _event: &FileSkippedEvent) {}

    // ---- Persistence ----
    fn on_report_persisted(&self, _event: &ReportPersistedEvent) {}
}
