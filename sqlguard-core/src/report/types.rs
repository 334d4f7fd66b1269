//! Report types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AnalysisMode;
use crate::detect::ReportIssue;
use crate::run::RunStatus;

/// Counters shared by the report and the run record.
/// Invariant: `total_issues == critical + warning + info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_issues: usize,
    pub critical_issues: usize,
    pub warning_issues: usize,
    pub info_issues: usize,
    /// Distinct files that contributed at least one accepted fragment.
    pub files_analyzed: usize,
    /// Accepted fragments, real and structural.
    pub queries_analyzed: usize,
}

/// The aggregate output of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub mode: AnalysisMode,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub summary: ReportSummary,
    /// Issues in discovery order.
    pub issues: Vec<ReportIssue>,
}
