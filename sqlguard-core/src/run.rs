//! Run record: identity, configuration, counters, and the status machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{AnalysisConfig, AnalysisMode};
use crate::errors::AnalysisError;
use crate::report::ReportSummary;

/// Run lifecycle states. Transitions are monotonic:
/// STARTED -> IN_PROGRESS -> {COMPLETED | FAILED}, terminal states included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Started,
    InProgress,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "STARTED" => Some(Self::Started),
            "IN_PROGRESS" => Some(Self::InProgress),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    fn can_transition_to(&self, next: RunStatus) -> bool {
        match self {
            Self::Started => matches!(
                next,
                RunStatus::InProgress | RunStatus::Completed | RunStatus::Failed
            ),
            Self::InProgress => matches!(next, RunStatus::Completed | RunStatus::Failed),
            Self::Completed | Self::Failed => false,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-part handle to a stored report artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLocation {
    pub container: String,
    pub key: String,
}

/// One analysis execution. Mutated only by the orchestrator; persisted
/// through the run store at every transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRun {
    pub id: Uuid,
    pub mode: AnalysisMode,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub config: AnalysisConfig,
    pub summary: ReportSummary,
    /// Only attached by the COMPLETED transition.
    pub report_ref: Option<ReportLocation>,
}

impl AnalysisRun {
    pub fn new(mode: AnalysisMode, config: AnalysisConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            status: RunStatus::Started,
            started_at: Utc::now(),
            completed_at: None,
            config,
            summary: ReportSummary::default(),
            report_ref: None,
        }
    }

    pub fn mark_in_progress(&mut self) -> Result<(), AnalysisError> {
        self.transition(RunStatus::InProgress)
    }

    /// Terminal success: records counters and the report handle.
    pub fn complete(
        &mut self,
        summary: ReportSummary,
        report_ref: ReportLocation,
    ) -> Result<(), AnalysisError> {
        self.transition(RunStatus::Completed)?;
        self.summary = summary;
        self.report_ref = Some(report_ref);
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Terminal failure: partial results are discarded, no report ref.
    pub fn fail(&mut self) -> Result<(), AnalysisError> {
        self.transition(RunStatus::Failed)?;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    fn transition(&mut self, next: RunStatus) -> Result<(), AnalysisError> {
        if !self.status.can_transition_to(next) {
            return Err(AnalysisError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
