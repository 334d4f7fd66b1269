//! Issue types produced by the detection rules.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issue severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Rendering order for grouped output.
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Warning, Severity::Info];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier naming a detection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Technique {
    SqlInjectionRisk,
    MissingWhereClause,
    SelectStarUsage,
    InefficientLikePattern,
    CountWithoutLimit,
    OrderByWithoutLimit,
    MultipleOrConditions,
    PotentialCartesianJoin,
    JoinWithoutCondition,
    PotentialMissingIndex,
    UnparameterizedNativeQuery,
    NPlusOneRisk,
    EagerCollectionFetch,
    JoinWithoutFetch,
    ModifyingWithoutTransactional,
}

impl Technique {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SqlInjectionRisk => "SQL_INJECTION_RISK",
            Self::MissingWhereClause => "MISSING_WHERE_CLAUSE",
            Self::SelectStarUsage => "SELECT_STAR_USAGE",
            Self::InefficientLikePattern => "INEFFICIENT_LIKE_PATTERN",
            Self::CountWithoutLimit => "COUNT_WITHOUT_LIMIT",
            Self::OrderByWithoutLimit => "ORDER_BY_WITHOUT_LIMIT",
            Self::MultipleOrConditions => "MULTIPLE_OR_CONDITIONS",
            Self::PotentialCartesianJoin => "POTENTIAL_CARTESIAN_JOIN",
            Self::JoinWithoutCondition => "JOIN_WITHOUT_CONDITION",
            Self::PotentialMissingIndex => "POTENTIAL_MISSING_INDEX",
            Self::UnparameterizedNativeQuery => "UNPARAMETERIZED_NATIVE_QUERY",
            Self::NPlusOneRisk => "N_PLUS_ONE_RISK",
            Self::EagerCollectionFetch => "EAGER_COLLECTION_FETCH",
            Self::JoinWithoutFetch => "JOIN_WITHOUT_FETCH",
            Self::ModifyingWithoutTransactional => "MODIFYING_WITHOUT_TRANSACTIONAL",
        }
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of an issue within a source file. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLocation {
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// One detected problem. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportIssue {
    pub id: Uuid,
    pub severity: Severity,
    pub technique: Technique,
    pub description: String,
    pub suggestion: String,
    /// Offending query text (or structural context snippet).
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<IssueLocation>,
    /// Heuristic certainty in [0, 1]; not a calibrated probability.
    pub confidence: f32,
}

impl ReportIssue {
    pub fn new(
        severity: Severity,
        technique: Technique,
        description: impl Into<String>,
        suggestion: impl Into<String>,
        query: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            severity,
            technique,
            description: description.into(),
            suggestion: suggestion.into(),
            query: query.into(),
            location: None,
            confidence,
        }
    }

    pub fn with_location(mut self, location: IssueLocation) -> Self {
        self.location = Some(location);
        self
    }
}
