//! Rule trait and the inputs every rule receives.

use crate::extract::{LineSpan, StructuralCandidate};
use crate::validate::ParsedQuery;

use super::types::{IssueLocation, ReportIssue, Technique};

/// A fragment ready for detection: either a validated SQL query or a
/// synthetic structural candidate. Rules pattern-match on the variant they
/// handle and return nothing for the other.
#[derive(Debug, Clone, Copy)]
pub enum AnalyzedFragment<'a> {
    Sql(&'a ParsedQuery),
    Structural(&'a StructuralCandidate),
}

impl AnalyzedFragment<'_> {
    pub fn text(&self) -> &str {
        match self {
            Self::Sql(query) => &query.text,
            Self::Structural(candidate) => &candidate.context,
        }
    }

    pub fn span(&self) -> LineSpan {
        match self {
            Self::Sql(query) => query.span,
            Self::Structural(candidate) => candidate.span,
        }
    }
}

/// Per-file context shared by every rule invocation.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub path: &'a str,
    /// Test code gets several safety rules suppressed.
    pub is_test: bool,
    /// Full file source, for rules that need more than the fragment window.
    pub source: &'a str,
}

impl<'a> FileContext<'a> {
    pub fn new(path: &'a str, source: &'a str) -> Self {
        Self {
            path,
            is_test: is_test_path(path),
            source,
        }
    }

    /// Location of a fragment span within this file.
    pub fn location(&self, span: LineSpan) -> IssueLocation {
        IssueLocation {
            file: self.path.to_string(),
            start_line: span.start_line,
            end_line: span.end_line,
            column: span.column,
        }
    }
}

/// A single detection rule. Stateless and pure: same inputs, same issues.
pub trait Rule: Send + Sync {
    fn technique(&self) -> Technique;

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue>;
}

/// Whether a path denotes test code: a `/test/` path segment, or a file
/// stem with a conventional test/spec suffix.
pub fn is_test_path(path: &str) -> bool {
    if path.contains("/test/") {
        return true;
    }

    let name = path.rsplit('/').next().unwrap_or(path);
    let stem = name.split('.').next().unwrap_or(name);
    if stem.ends_with("Test") || stem.ends_with("Tests") || stem.ends_with("IT") {
        return true;
    }

    let lower = name.to_ascii_lowercase();
    lower.contains(".spec.") || lower.contains(".test.") || stem.to_ascii_lowercase().ends_with("_test")
}
