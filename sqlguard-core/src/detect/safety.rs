//! Safety rules: injection, unguarded mutations, unparameterized raw queries.

use once_cell::sync::Lazy;
use regex::Regex;

use super::traits::{AnalyzedFragment, FileContext, Rule};
use super::types::{ReportIssue, Severity, Technique};

/// Quoted text directly adjacent to a concatenation operator.
static CONCAT_NEAR_QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["']\s*(?:\+|\|\|)|(?:\+|\|\|)\s*["']"#).unwrap());

static UPDATE_OR_DELETE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:UPDATE|DELETE)\b").unwrap());

static WHERE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bWHERE\b").unwrap());

/// Named (`:name`), positional (`?`), or numbered (`$1`) bind parameters.
static BIND_PARAMETER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?|:[A-Za-z_]\w*|\$\d+").unwrap());

/// Markers showing the file issues raw SQL directly.
const NATIVE_MARKERS: &[&str] = &[
    "nativeQuery = true",
    "nativeQuery=true",
    "createNativeQuery",
    "prepareStatement",
];

pub struct SqlInjectionRisk;

impl Rule for SqlInjectionRisk {
    fn technique(&self) -> Technique {
        Technique::SqlInjectionRisk
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Sql(query) = fragment else {
            return Vec::new();
        };
        if ctx.is_test || !CONCAT_NEAR_QUOTE.is_match(&query.text) {
            return Vec::new();
        }

        vec![ReportIssue::new(
            Severity::Critical,
            self.technique(),
            "String concatenation adjacent to quoted text builds SQL from runtime values",
            "Replace concatenated values with bind parameters",
            &query.text,
            0.95,
        )
        .with_location(ctx.location(query.span))]
    }
}

pub struct MissingWhereClause;

impl Rule for MissingWhereClause {
    fn technique(&self) -> Technique {
        Technique::MissingWhereClause
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Sql(query) = fragment else {
            return Vec::new();
        };
        if ctx.is_test || !UPDATE_OR_DELETE.is_match(&query.text) || WHERE.is_match(&query.text) {
            return Vec::new();
        }

        vec![ReportIssue::new(
            Severity::Critical,
            self.technique(),
            "UPDATE or DELETE without a WHERE clause affects every row",
            "Add a WHERE clause, or make the full-table intent explicit",
            &query.text,
            1.0,
        )
        .with_location(ctx.location(query.span))]
    }
}

pub struct UnparameterizedNativeQuery;

impl Rule for UnparameterizedNativeQuery {
    fn technique(&self) -> Technique {
        Technique::UnparameterizedNativeQuery
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Sql(query) = fragment else {
            return Vec::new();
        };
        let is_native = NATIVE_MARKERS.iter().any(|marker| ctx.source.contains(marker));
        if !is_native || BIND_PARAMETER.is_match(&query.text) {
            return Vec::new();
        }

        vec![ReportIssue::new(
            Severity::Critical,
            self.technique(),
            "Native query without named or positional bind parameters",
            "Add `?` or `:name` placeholders and bind values instead of inlining them",
            &query.text,
            0.9,
        )
        .with_location(ctx.location(query.span))]
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

    fn ctx<'a>(path: &'a str, source: &'a str) -> FileContext<'a> {
        FileContext::new(path, source)
    }

    #[test]
    fn missing_where_emits_exactly_one_critical_with_full_confidence() {
        let query = parse("UPDATE users SET active = false");
        let issues = MissingWhereClause.detect(
            &AnalyzedFragment::Sql(&query),
            &ctx("db/patch.sql", ""),
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert_eq!(issues[0].technique, Technique::MissingWhereClause);
        assert_eq!(issues[0].confidence, 1.0);
    }

    #[test]
    fn missing_where_respects_where_clause() {
        let query = parse("DELETE FROM users WHERE id = 1");
        let issues =
            MissingWhereClause.detect(&AnalyzedFragment::Sql(&query), &ctx("db/patch.sql", ""));
        assert!(issues.is_empty());
    }

    #[test]
    fn injection_fires_on_quote_adjacent_concatenation() {
        let query = parse("SELECT * FROM users WHERE name = 'admin' || role");
        let issues =
            SqlInjectionRisk.detect(&AnalyzedFragment::Sql(&query), &ctx("Repo.java", ""));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].confidence, 0.95);
    }

    #[test]
    fn injection_is_suppressed_in_test_code() {
        let query = parse("SELECT * FROM users WHERE name = 'admin' || role");
        let issues = SqlInjectionRisk.detect(
            &AnalyzedFragment::Sql(&query),
            &ctx("src/test/java/RepoTest.java", ""),
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn native_query_without_placeholders_is_critical() {
        let source = r#"em.createNativeQuery("SELECT * FROM users WHERE role = 'admin'")"#;
        let query = parse("SELECT * FROM users WHERE role = 'admin'");
        let issues = UnparameterizedNativeQuery
            .detect(&AnalyzedFragment::Sql(&query), &ctx("Repo.java", source));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Critical);
    }

    #[test]
    fn native_query_with_placeholders_passes() {
        let source = r#"em.createNativeQuery("SELECT * FROM users WHERE role = ?")"#;
        let query = parse("SELECT * FROM users WHERE role = ?");
        let issues = UnparameterizedNativeQuery
            .detect(&AnalyzedFragment::Sql(&query), &ctx("Repo.java", source));
        assert!(issues.is_empty());
    }
}
