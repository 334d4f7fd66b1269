//! Performance rules: projection width, scan-unfriendly predicates,
//! unbounded result sets, and index heuristics.

use once_cell::sync::Lazy;
use regex::Regex;

use super::traits::{AnalyzedFragment, FileContext, Rule};
use super::types::{ReportIssue, Severity, Technique};

static SELECT_BARE_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bSELECT\s+\*").unwrap());

static SELECT_QUALIFIED_STAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\bSELECT\b[^;]*?\b\w+\.\*").unwrap());

static LEADING_WILDCARD_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bLIKE\s+["']%"#).unwrap());

static COUNT_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bCOUNT\s*\(\s*\*\s*\)").unwrap());

static LIMIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bLIMIT\b").unwrap());

static WHERE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bWHERE\b").unwrap());

static ORDER_BY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bORDER\s+BY\b").unwrap());

static OR_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bOR\b").unwrap());

static EQUALITY_COLUMN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(\w+)\s*=").unwrap());

static WHERE_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)\bWHERE\b(.*)").unwrap());

static COMPARISON_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\w+)\s*(?:=|<>|!=|>=|<=|>|<|\bLIKE\b)").unwrap());

pub struct SelectStarUsage;

impl Rule for SelectStarUsage {
    fn technique(&self) -> Technique {
        Technique::SelectStarUsage
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Sql(query) = fragment else {
            return Vec::new();
        };
        if ctx.is_test {
            return Vec::new();
        }

        let confidence = if SELECT_BARE_STAR.is_match(&query.text) {
            0.9
        } else if SELECT_QUALIFIED_STAR.is_match(&query.text) {
            0.8
        } else {
            return Vec::new();
        };

        vec![ReportIssue::new(
            Severity::Warning,
            self.technique(),
            "SELECT * fetches every column and breaks when the schema changes",
            "List the columns the caller actually needs",
            &query.text,
            confidence,
        )
        .with_location(ctx.location(query.span))]
    }
}

pub struct InefficientLikePattern;

impl Rule for InefficientLikePattern {
    fn technique(&self) -> Technique {
        Technique::InefficientLikePattern
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Sql(query) = fragment else {
            return Vec::new();
        };
        if !LEADING_WILDCARD_LIKE.is_match(&query.text) {
            return Vec::new();
        }

        vec![ReportIssue::new(
            Severity::Warning,
            self.technique(),
            "LIKE with a leading wildcard cannot use an index and scans the table",
            "Anchor the pattern, or use a full-text / trigram index",
            &query.text,
            0.9,
        )
        .with_location(ctx.location(query.span))]
    }
}

pub struct CountWithoutLimit;

impl Rule for CountWithoutLimit {
    fn technique(&self) -> Technique {
        Technique::CountWithoutLimit
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Sql(query) = fragment else {
            return Vec::new();
        };
        if !COUNT_STAR.is_match(&query.text) || LIMIT.is_match(&query.text) {
            return Vec::new();
        }

        vec![ReportIssue::new(
            Severity::Warning,
            self.technique(),
            "COUNT(*) without LIMIT scans the full table on large relations",
            "Consider an approximate count or an existence check",
            &query.text,
            0.7,
        )
        .with_location(ctx.location(query.span))]
    }
}

pub struct OrderByWithoutLimit;

impl Rule for OrderByWithoutLimit {
    fn technique(&self) -> Technique {
        Technique::OrderByWithoutLimit
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Sql(query) = fragment else {
            return Vec::new();
        };
        let text = &query.text;
        if !ORDER_BY.is_match(text) || LIMIT.is_match(text) || WHERE.is_match(text) {
            return Vec::new();
        }

        vec![ReportIssue::new(
            Severity::Warning,
            self.technique(),
            "ORDER BY over an unfiltered, unlimited result set sorts the whole table",
            "Add a WHERE filter or a LIMIT",
            text,
            0.6,
        )
        .with_location(ctx.location(query.span))]
    }
}

pub struct MultipleOrConditions;

impl Rule for MultipleOrConditions {
    fn technique(&self) -> Technique {
        Technique::MultipleOrConditions
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Sql(query) = fragment else {
            return Vec::new();
        };
        let text = &query.text;
        if OR_TOKEN.find_iter(text).count() < 3 {
            return Vec::new();
        }

        // Equality chains count as same-column when one column name dominates.
        let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
        for captures in EQUALITY_COLUMN.captures_iter(text) {
            *counts
                .entry(captures[1].to_ascii_lowercase())
                .or_insert(0) += 1;
        }
        if !counts.values().any(|&n| n >= 3) {
            return Vec::new();
        }

        vec![ReportIssue::new(
            Severity::Info,
            self.technique(),
            "Chained OR equality conditions on the same column",
            "Rewrite as `column IN (...)`",
            text,
            0.6,
        )
        .with_location(ctx.location(query.span))]
    }
}

pub struct PotentialMissingIndex;

/// Column names assumed to be indexed: keys, timestamps, status flags.
fn likely_indexed(column: &str) -> bool {
    matches!(column, "id" | "uuid" | "guid" | "status" | "timestamp")
        || column.ends_with("_id")
        || column.ends_with("_uuid")
        || column.ends_with("_at")
        || column.ends_with("_key")
}

impl Rule for PotentialMissingIndex {
    fn technique(&self) -> Technique {
        Technique::PotentialMissingIndex
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Sql(query) = fragment else {
            return Vec::new();
        };
        let Some(captures) = WHERE_TAIL.captures(&query.text) else {
            return Vec::new();
        };
        let tail = &captures[1];

        // At most one issue per fragment: the first suspicious column wins.
        for captures in COMPARISON_COLUMN.captures_iter(tail) {
            let column = captures[1].to_ascii_lowercase();
            if column == "like" || likely_indexed(&column) {
                continue;
            }
            return vec![ReportIssue::new(
                Severity::Info,
                self.technique(),
                format!("Predicate on `{column}` which does not look indexed"),
                "Check whether this column needs an index",
                &query.text,
                0.5,
            )
            .with_location(ctx.location(query.span))];
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SqlDialect;
    use crate::extract::LineSpan;
    use crate::validate::{ParsedQuery, SyntaxValidator};

    fn parse(sql: &str) -> ParsedQuery {
        SyntaxValidator::new(SqlDialect::Generic)
            .validate(sql, LineSpan::line(1))
            .expect("test SQL must parse")
    }

    fn main_ctx() -> FileContext<'static> {
        FileContext::new("src/main/java/Repo.java", "")
    }

    fn one(rule: &dyn Rule, sql: &str) -> Vec<ReportIssue> {
        let query = parse(sql);
        rule.detect(&AnalyzedFragment::Sql(&query), &main_ctx())
    }

    #[test]
    fn bare_star_scores_higher_than_qualified_star() {
        let bare = one(&SelectStarUsage, "SELECT * FROM users WHERE id = 1");
        assert_eq!(bare[0].confidence, 0.9);
        assert_eq!(bare[0].severity, Severity::Warning);

        let qualified = one(&SelectStarUsage, "SELECT u.* FROM users u WHERE u.id = 1");
        assert_eq!(qualified[0].confidence, 0.8);
    }

    #[test]
    fn select_star_is_suppressed_in_test_paths() {
        let query = parse("SELECT * FROM users WHERE id = 1");
        let ctx = FileContext::new("src/test/java/RepoTest.java", "");
        assert!(SelectStarUsage
            .detect(&AnalyzedFragment::Sql(&query), &ctx)
            .is_empty());
    }

    #[test]
    fn leading_wildcard_like_is_flagged() {
        let issues = one(
            &InefficientLikePattern,
            "SELECT id FROM users WHERE name LIKE '%smith'",
        );
        assert_eq!(issues.len(), 1);
        assert!(one(
            &InefficientLikePattern,
            "SELECT id FROM users WHERE name LIKE 'smith%'"
        )
        .is_empty());
    }

    #[test]
    fn count_star_without_limit_warns() {
        assert_eq!(one(&CountWithoutLimit, "SELECT COUNT(*) FROM events").len(), 1);
        assert!(one(&CountWithoutLimit, "SELECT COUNT(*) FROM events LIMIT 1").is_empty());
    }

    #[test]
    fn order_by_needs_where_or_limit() {
        assert_eq!(
            one(&OrderByWithoutLimit, "SELECT id FROM users ORDER BY name").len(),
            1
        );
        assert!(one(
            &OrderByWithoutLimit,
            "SELECT id FROM users WHERE active = true ORDER BY name"
        )
        .is_empty());
        assert!(one(&OrderByWithoutLimit, "SELECT id FROM users ORDER BY name LIMIT 10").is_empty());
    }

    #[test]
    fn or_chains_on_one_column_are_reported() {
        let issues = one(
            &MultipleOrConditions,
            "SELECT id FROM users WHERE role = 'a' OR role = 'b' OR role = 'c' OR role = 'd'",
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);

        // Mixed columns: no dominant equality chain.
        assert!(one(
            &MultipleOrConditions,
            "SELECT id FROM users WHERE a = 1 OR b = 2 OR c = 3 OR d = 4",
        )
        .is_empty());
    }

    #[test]
    fn missing_index_reports_at_most_once_per_fragment() {
        let issues = one(
            &PotentialMissingIndex,
            "SELECT id FROM users WHERE nickname = 'x' AND biography LIKE 'y%'",
        );
        assert_eq!(issues.len(), 1);
        assert!(issues[0].description.contains("nickname"));
    }

    #[test]
    fn indexed_looking_columns_do_not_fire() {
        assert!(one(
            &PotentialMissingIndex,
            "SELECT id FROM orders WHERE user_id = 1 AND created_at > '2024-01-01' AND status = 'open'",
        )
        .is_empty());
    }
}
