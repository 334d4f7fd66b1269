//! SQL string extraction from source-code files.
//!
//! A fixed, ordered set of patterns is applied over the whole file:
//! triple-quoted blocks, plain string literals, annotation query
//! declarations, named-query declarations, and prepared-statement call
//! arguments. Matches are deduplicated by position and text so a string
//! captured by more than one pattern yields a single candidate.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

use super::types::{Fragment, LineSpan};
use super::{contains_sql_keyword, line_of_offset};

static TRIPLE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)"{3}(.+?)"{3}|'{3}(.+?)'{3}"#).unwrap());

static DOUBLE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"\r\n]+)""#).unwrap());

static SINGLE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"'([^'\r\n]+)'").unwrap());

static ANNOTATION_QUERY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@(?:Query|NativeQuery)\s*\(\s*(?:value\s*=\s*)?"((?:[^"\\]|\\.)+)""#).unwrap()
});

static NAMED_QUERY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@NamedQuer(?:y|ies)\s*\([^)]*query\s*=\s*"((?:[^"\\]|\\.)+)""#).unwrap()
});

static PREPARED_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:prepareStatement|prepareCall|createNativeQuery|createQuery|executeQuery|executeUpdate)\s*\(\s*"((?:[^"\\]|\\.)+)""#,
    )
    .unwrap()
});

pub fn extract(source: &str) -> Vec<Fragment> {
    let patterns: [&Regex; 6] = [
        &TRIPLE_QUOTED,
        &DOUBLE_QUOTED,
        &SINGLE_QUOTED,
        &ANNOTATION_QUERY,
        &NAMED_QUERY,
        &PREPARED_CALL,
    ];

    let mut seen: FxHashSet<(u32, String)> = FxHashSet::default();
    let mut fragments = Vec::new();

    for pattern in patterns {
        for captures in pattern.captures_iter(source) {
            // The alternation in TRIPLE_QUOTED can bind either group.
            let Some(matched) = captures.get(1).or_else(|| captures.get(2)) else {
                continue;
            };
            let text = matched.as_str().trim();
            if text.is_empty() || !contains_sql_keyword(text) {
                continue;
            }

            let start_line = line_of_offset(source, matched.start());
            let end_line = line_of_offset(source, matched.end());
            if !seen.insert((start_line, text.to_string())) {
                continue;
            }

            fragments.push(Fragment::sql(text, LineSpan::range(start_line, end_line)));
        }
    }

    fragments
}
