//! Snippet extraction - produces candidate fragments per file category.
//!
//! SQL files are split statement-by-statement, code files go through an
//! ordered regex pattern set plus the structural ORM scan, config files get
//! a keyword line scan. Every textual candidate must contain at least one
//! SQL keyword to survive.

mod code;
mod config_files;
mod sql_files;
mod structural;
mod types;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

use crate::classifier::FileCategory;

pub use types::{Fragment, LineSpan, SqlCandidate, StructuralCandidate, StructuralKind};

/// Keyword set gating every textual candidate.
const SQL_KEYWORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "CREATE", "ALTER", "DROP", "TRUNCATE",
];

static KEYWORD_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(SQL_KEYWORDS)
        .unwrap()
});

/// Returns `true` when the text contains at least one SQL keyword,
/// ASCII case-insensitive.
pub(crate) fn contains_sql_keyword(text: &str) -> bool {
    KEYWORD_MATCHER.is_match(text)
}

/// 1-based line number of a byte offset within `source`.
pub(crate) fn line_of_offset(source: &str, offset: usize) -> u32 {
    source[..offset].bytes().filter(|b| *b == b'\n').count() as u32 + 1
}

/// Extracts all candidate fragments from one file.
///
/// Structural candidates are only produced for code files and are appended
/// after the textual candidates, preserving discovery order within each
/// extraction pass.
pub fn extract(category: FileCategory, source: &str) -> Vec<Fragment> {
    match category {
        FileCategory::Sql => sql_files::extract(source),
        FileCategory::Code => {
            let mut fragments = code::extract(source);
            fragments.extend(structural::extract(source));
            fragments
        }
        FileCategory::Config => config_files::extract(source),
    }
}
