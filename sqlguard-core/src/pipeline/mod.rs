//! Orchestrator - drives one run through discovery, per-file analysis,
//! aggregation, and persistence.
//!
//! Per-file work fans out across the rayon pool and joins before
//! aggregation. Persistence is a small task graph on the I/O pool: the two
//! report serializations write concurrently, and the run-record update is
//! ordered strictly after the JSON write because it needs the resulting
//! location handle. Completion waits on all three.

mod io_pool;

use std::fs;
use std::sync::Arc;

use chrono::Utc;
use rayon::prelude::*;
use uuid::Uuid;

use crate::classifier::{CandidateFile, FileWalker};
use crate::config::{AnalysisConfig, AnalysisMode};
use crate::detect::{self, AnalyzedFragment, FileContext};
use crate::errors::AnalysisError;
use crate::events::{
    EventDispatcher, FileAnalyzedEvent, FileSkippedEvent, FilesDiscoveredEvent, IssueCounts,
    ReportPersistedEvent, RunCompletedEvent, RunFailedEvent, RunStartedEvent,
};
use crate::extract::{self, Fragment};
use crate::report::{self, FileAnalysis};
use crate::run::{AnalysisRun, RunStatus};
use crate::stores::{ArtifactStore, RunStore};
use crate::validate::SyntaxValidator;

pub use io_pool::{IoPool, TaskHandle};

/// The analysis entry point. `analyze` is expected to be invoked exactly
/// once per run id, off the request-handling thread.
pub struct Analyzer {
    runs: Arc<dyn RunStore>,
    artifacts: Arc<dyn ArtifactStore>,
    events: EventDispatcher,
    io: IoPool,
}

impl Analyzer {
    pub fn new(
        runs: Arc<dyn RunStore>,
        artifacts: Arc<dyn ArtifactStore>,
        events: EventDispatcher,
    ) -> Self {
        Self {
            runs,
            artifacts,
            events,
            io: IoPool::with_default_size(),
        }
    }

    /// Runs the full discovery -> report -> persist pipeline for `run_id`.
    ///
    /// Any error transitions the run to FAILED and abandons in-flight report
    /// generation; partial results are never persisted. Nothing is retried.
    pub fn analyze(
        &self,
        run_id: Uuid,
        config: &AnalysisConfig,
    ) -> Result<AnalysisRun, AnalysisError> {
        let mut run = self
            .runs
            .load(run_id)?
            .ok_or(AnalysisError::RunNotFound { id: run_id })?;

        match self.run_pipeline(&mut run, config) {
            Ok(()) => Ok(run),
            Err(err) => {
                tracing::error!(run_id = %run.id, error = %err, "analysis run failed");
                if !run.status.is_terminal() {
                    run.fail().ok();
                    if let Err(save_err) = self.runs.save(&run) {
                        tracing::error!(run_id = %run.id, error = %save_err, "failed to persist FAILED state");
                    }
                }
                self.events.run_failed(&RunFailedEvent {
                    run_id: run.id,
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn run_pipeline(
        &self,
        run: &mut AnalysisRun,
        config: &AnalysisConfig,
    ) -> Result<(), AnalysisError> {
        if run.mode != AnalysisMode::Static {
            return Err(AnalysisError::UnsupportedMode);
        }

        run.mark_in_progress()?;
        self.runs.save(run)?;
        self.events.run_started(&RunStartedEvent {
            run_id: run.id,
            mode: run.mode,
        });

        let candidates = FileWalker::new(config).discover();
        if candidates.is_empty() {
            return Err(AnalysisError::NoCandidateFiles {
                root: config.source_root.clone(),
            });
        }
        self.events.files_discovered(&FilesDiscoveredEvent {
            run_id: run.id,
            candidates: candidates.len(),
        });

        // CPU-bound fan-out; the join happens at collect, so aggregation
        // only starts once every file's rules have run.
        let validator = SyntaxValidator::new(config.dialect);
        let run_id = run.id;
        let outcomes: Vec<FileAnalysis> = candidates
            .par_iter()
            .filter_map(|candidate| match analyze_file(candidate, validator) {
                Ok(outcome) => {
                    self.events.file_analyzed(&FileAnalyzedEvent {
                        run_id,
                        path: outcome.path.clone(),
                        fragments: outcome.accepted_fragments,
                        issues: outcome.issues.len(),
                    });
                    Some(outcome)
                }
                Err(err) => {
                    tracing::warn!(path = %candidate.path.display(), error = %err, "skipping unreadable file");
                    self.events.file_skipped(&FileSkippedEvent {
                        run_id,
                        path: candidate.path.display().to_string(),
                        reason: err.to_string(),
                    });
                    None
                }
            })
            .collect();

        // The report always describes a completed run; the record itself
        // completes once the artifact write lands.
        let mut report = report::build_report(run, &outcomes);
        report.status = RunStatus::Completed;
        report.completed_at = Some(Utc::now());

        let json_bytes = report::json::render(&report)?;
        let text_bytes = report::text::render(&report).into_bytes();

        // Two leaf writes, one dependent update.
        let artifacts = Arc::clone(&self.artifacts);
        let json_write = self
            .io
            .submit(move || artifacts.store(&json_bytes, "application/json"));
        let artifacts = Arc::clone(&self.artifacts);
        let text_write = self
            .io
            .submit(move || artifacts.store(&text_bytes, "text/plain"));

        // The record update needs the JSON write's location handle, and the
        // run may only turn COMPLETED once both representations are durable.
        let location = json_write.join()??;
        text_write.join()??;
        run.complete(report.summary.clone(), location.clone())?;
        let runs = Arc::clone(&self.runs);
        let snapshot = run.clone();
        self.io.submit(move || runs.save(&snapshot)).join()??;

        self.events.report_persisted(&ReportPersistedEvent {
            run_id: run.id,
            location,
        });
        self.events.run_completed(&RunCompletedEvent {
            run_id: run.id,
            counts: IssueCounts {
                total: report.summary.total_issues,
                critical: report.summary.critical_issues,
                warning: report.summary.warning_issues,
                info: report.summary.info_issues,
            },
            files_analyzed: report.summary.files_analyzed,
            queries_analyzed: report.summary.queries_analyzed,
        });

        Ok(())
    }
}

/// Extraction, validation, and detection for one candidate file.
fn analyze_file(
    candidate: &CandidateFile,
    validator: SyntaxValidator,
) -> Result<FileAnalysis, AnalysisError> {
    let source = fs::read_to_string(&candidate.path).map_err(|err| AnalysisError::Io {
        path: candidate.path.clone(),
        source: err,
    })?;

    let path = candidate.path.display().to_string();
    let ctx = FileContext::new(&path, &source);

    let mut accepted_fragments = 0usize;
    let mut issues = Vec::new();
    for fragment in extract::extract(candidate.category, &source) {
        match fragment {
            Fragment::Sql(sql) => {
                let Some(query) = validator.validate(&sql.text, sql.span) else {
                    continue;
                };
                accepted_fragments += 1;
                issues.extend(detect::detect(&AnalyzedFragment::Sql(&query), &ctx));
            }
            Fragment::Structural(structural) => {
                accepted_fragments += 1;
                issues.extend(detect::detect(
                    &AnalyzedFragment::Structural(&structural),
                    &ctx,
                ));
            }
        }
    }

    Ok(FileAnalysis {
        path,
        accepted_fragments,
        issues,
    })
}
