//! Synchronous fan-out of events to registered handlers.

use std::sync::Arc;

use super::handler::AnalysisEventHandler;
use super::types::*;

/// Dispatches events to every registered handler, in registration order,
/// on the calling thread.
#[derive(Clone, Default)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn AnalysisEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn AnalysisEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn run_started(&self, event: &RunStartedEvent) {
        for handler in &self.handlers {
            handler.on_run_started(event);
        }
    }

    pub fn run_completed(&self, event: &RunCompletedEvent) {
        for handler in &self.handlers {
            handler.on_run_completed(event);
        }
    }

    pub fn run_failed(&self, event: &RunFailedEvent) {
        for handler in &self.handlers {
            handler.on_run_failed(event);
        }
    }

    pub fn files_discovered(&self, event: &FilesDiscoveredEvent) {
        for handler in &self.handlers {
            handler.on_files_discovered(event);
        }
    }

    pub fn file_analyzed(&self, event: &FileAnalyzedEvent) {
        for handler in &self.handlers {
            handler.on_file_analyzed(event);
        }
    }

    pub fn file_skipped(&self, event: &FileSkippedEvent) {
        for handler in &self.handlers {
            handler.on_file_skipped(event);
        }
    }

    pub fn report_persisted(&self, event: &ReportPersistedEvent) {
        for handler in &self.handlers {
            handler.on_report_persisted(event);
        }
    }
}
