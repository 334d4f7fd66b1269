//! Keyword line scan for structured config files.

use super::types::{Fragment, LineSpan};
use super::contains_sql_keyword;

pub fn extract(source: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let line_no = idx as u32 + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || !contains_sql_keyword(trimmed) {
            continue;
        }

        // YAML list items carry their marker; strip it.
        let candidate = trimmed.strip_prefix("- ").unwrap_or(trimmed).trim();
        if candidate.is_empty() {
            continue;
        }
        fragments.push(Fragment::sql(candidate, LineSpan::line(line_no)));
    }

    fragments
}
