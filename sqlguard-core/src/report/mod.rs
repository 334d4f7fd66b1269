//! Report aggregation and rendering.
//!
//! The aggregator computes one `AnalysisReport` per run; both serializations
//! (machine JSON, human text) derive from that single value with no extra
//! state.

pub mod json;
pub mod text;
mod types;

pub use types::{AnalysisReport, ReportSummary};

use crate::detect::{ReportIssue, Severity};
use crate::run::AnalysisRun;

/// Per-file outcome joining the fan-out: how many fragments were accepted
/// (validated SQL plus structural candidates) and what the rules found.
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    pub path: String,
    pub accepted_fragments: usize,
    pub issues: Vec<ReportIssue>,
}

/// Builds the report for a run from the joined per-file outcomes.
/// Issues keep discovery order: file order, then fragment order, then
/// registry order.
pub fn build_report(run: &AnalysisRun, outcomes: &[FileAnalysis]) -> AnalysisReport {
    let issues: Vec<ReportIssue> = outcomes
        .iter()
        .flat_map(|outcome| outcome.issues.iter().cloned())
        .collect();

    let summary = ReportSummary {
        total_issues: issues.len(),
        critical_issues: count(&issues, Severity::Critical),
        warning_issues: count(&issues, Severity::Warning),
        info_issues: count(&issues, Severity::Info),
        files_analyzed: outcomes
            .iter()
            .filter(|outcome| outcome.accepted_fragments > 0)
            .count(),
        queries_analyzed: outcomes.iter().map(|outcome| outcome.accepted_fragments).sum(),
    };

    AnalysisReport {
        run_id: run.id,
        mode: run.mode,
        status: run.status,
        started_at: run.started_at,
        completed_at: run.completed_at,
        summary,
        issues,
    }
}

fn count(issues: &[ReportIssue], severity: Severity) -> usize {
    issues.iter().filter(|issue| issue.severity == severity).count()
}
