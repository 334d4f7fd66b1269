//! Structural extraction - ORM relationship annotations that signal risk
//! without any literal SQL being present.
//!
//! Each match becomes a synthetic `Fragment::Structural` carrying the
//! surrounding source lines for human context. These candidates bypass the
//! syntax validator and are routed to the relationship rules.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{Fragment, LineSpan, StructuralCandidate, StructuralKind};
use super::line_of_offset;

/// Lines of surrounding context captured before and after a match.
const CONTEXT_LINES: usize = 2;

static RELATIONSHIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"@(OneToMany|ManyToMany|ManyToOne|OneToOne)\b(?:\s*\(([^)]*)\))?").unwrap()
});

static EAGER_COLLECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@(?:OneToMany|ManyToMany)\s*\([^)]*FetchType\.EAGER[^)]*\)").unwrap());

static BULK_READ: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:findAll|getResultList|list)\s*\(").unwrap());

static ANNOTATED_QUERY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@Query\s*\(\s*(?:value\s*=\s*)?"((?:[^"\\]|\\.)+)""#).unwrap()
});

static MODIFYING: Lazy<Regex> = Lazy::new(|| Regex::new(r"@Modifying\b").unwrap());

pub fn extract(source: &str) -> Vec<Fragment> {
    let mut fragments = Vec::new();

    for captures in RELATIONSHIP.captures_iter(source) {
        let annotation = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let attrs = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
        if attrs.contains("fetch") {
            continue;
        }
        let collection = matches!(annotation, "OneToMany" | "ManyToMany");
        push(
            &mut fragments,
            source,
            captures.get(0).unwrap().start(),
            StructuralKind::RelationshipNoFetch { collection },
        );
    }

    if BULK_READ.is_match(source) {
        for matched in EAGER_COLLECTION.find_iter(source) {
            push(
                &mut fragments,
                source,
                matched.start(),
                StructuralKind::EagerCollection,
            );
        }
    }

    for captures in ANNOTATED_QUERY.captures_iter(source) {
        let query = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let upper = query.to_ascii_uppercase();
        if upper.contains("JOIN") && !upper.contains("JOIN FETCH") {
            push(
                &mut fragments,
                source,
                captures.get(0).unwrap().start(),
                StructuralKind::JoinNoFetch,
            );
        }
    }

    for matched in MODIFYING.find_iter(source) {
        push(
            &mut fragments,
            source,
            matched.start(),
            StructuralKind::UnmarkedMutation,
        );
    }

    fragments
}

fn push(fragments: &mut Vec<Fragment>, source: &str, offset: usize, kind: StructuralKind) {
    let line = line_of_offset(source, offset);
    let (context, span) = context_window(source, line);
    fragments.push(Fragment::Structural(StructuralCandidate {
        kind,
        context,
        span,
    }));
}

/// Snippet of source lines around `line` (1-based), ±CONTEXT_LINES.
fn context_window(source: &str, line: u32) -> (String, LineSpan) {
    let lines: Vec<&str> = source.lines().collect();
    let idx = (line as usize).saturating_sub(1);
    let start = idx.saturating_sub(CONTEXT_LINES);
    let end = (idx + CONTEXT_LINES + 1).min(lines.len());
    let snippet = lines[start..end].join("\n");
    (
        snippet,
        LineSpan::range(start as u32 + 1, end as u32),
    )
}
