//! Fragment types - the tagged union flowing through validation and detection.

use serde::{Deserialize, Serialize};

/// Line coordinates of a fragment within its source file. Lines are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    pub start_line: u32,
    pub end_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl LineSpan {
    pub fn line(line: u32) -> Self {
        Self {
            start_line: line,
            end_line: line,
            column: None,
        }
    }

    pub fn range(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line,
            column: None,
        }
    }
}

/// Structural ORM risk represented by a synthetic candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StructuralKind {
    /// Relationship annotation without an explicit fetch strategy.
    /// `collection` distinguishes to-many from to-one declarations.
    RelationshipNoFetch { collection: bool },
    /// Eagerly fetched collection in a file that also bulk-reads.
    EagerCollection,
    /// Annotated query joining without a fetch join.
    JoinNoFetch,
    /// Mutating annotated query; transactional pairing is checked against
    /// the whole file by the detector.
    UnmarkedMutation,
}

/// A real SQL candidate, headed for the syntax validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlCandidate {
    pub text: String,
    pub span: LineSpan,
}

/// A synthetic candidate carrying surrounding source lines for context.
/// Never valid SQL; bypasses the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralCandidate {
    pub kind: StructuralKind,
    pub context: String,
    pub span: LineSpan,
}

/// A candidate produced by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Sql(SqlCandidate),
    Structural(StructuralCandidate),
}

impl Fragment {
    pub fn sql(text: impl Into<String>, span: LineSpan) -> Self {
        Self::Sql(SqlCandidate {
            text: text.into(),
            span,
        })
    }

    pub fn span(&self) -> LineSpan {
        match self {
            Self::Sql(c) => c.span,
            Self::Structural(c) => c.span,
        }
    }

    /// Candidate text: the SQL itself, or the context snippet.
    pub fn text(&self) -> &str {
        match self {
            Self::Sql(c) => &c.text,
            Self::Structural(c) => &c.context,
        }
    }
}
