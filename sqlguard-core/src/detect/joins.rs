//! Join-correctness rules: implicit cartesian products and condition-less joins.

use once_cell::sync::Lazy;
use regex::Regex;

use super::traits::{AnalyzedFragment, FileContext, Rule};
use super::types::{ReportIssue, Severity, Technique};

static JOIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bJOIN\b").unwrap());

static ON_OR_USING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:ON|USING)\b").unwrap());

static FROM_CLAUSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)\bFROM\s+(.*?)(?:\bWHERE\b|\bGROUP\b|\bORDER\b|\bLIMIT\b|\bHAVING\b|;|$)")
        .unwrap()
});

/// Number of comma-separated items at paren depth zero.
fn top_level_items(clause: &str) -> usize {
    let mut depth = 0usize;
    let mut items = 1usize;
    for ch in clause.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => items += 1,
            _ => {}
        }
    }
    items
}

pub struct PotentialCartesianJoin;

impl Rule for PotentialCartesianJoin {
    fn technique(&self) -> Technique {
        Technique::PotentialCartesianJoin
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Sql(query) = fragment else {
            return Vec::new();
        };
        let text = &query.text;
        if JOIN.is_match(text) {
            return Vec::new();
        }
        let Some(captures) = FROM_CLAUSE.captures(text) else {
            return Vec::new();
        };
        if top_level_items(&captures[1]) < 2 {
            return Vec::new();
        }

        vec![ReportIssue::new(
            Severity::Critical,
            self.technique(),
            "Comma-separated tables without a JOIN produce a cartesian product",
            "Rewrite as an explicit JOIN with an ON condition",
            text,
            0.8,
        )
        .with_location(ctx.location(query.span))]
    }
}

pub struct JoinWithoutCondition;

impl Rule for JoinWithoutCondition {
    fn technique(&self) -> Technique {
        Technique::JoinWithoutCondition
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Sql(query) = fragment else {
            return Vec::new();
        };
        let text = &query.text;
        if !JOIN.is_match(text) || ON_OR_USING.is_match(text) {
            return Vec::new();
        }

        vec![ReportIssue::new(
            Severity::Warning,
            self.technique(),
            "JOIN with neither ON nor USING",
            "Add the join condition",
            text,
            0.7,
        )
        .with_location(ctx.location(query.span))]
    }
}
