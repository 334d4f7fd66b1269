//! Syntactic validation of real-SQL candidates.
//!
//! Candidates that fail to parse are dropped, not reported: a regex-extracted
//! fragment that the grammar rejects is far more likely an extraction
//! false-positive than a broken production query.

use sqlparser::ast::Statement;
use sqlparser::dialect::{
    GenericDialect, HiveDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect,
};
use sqlparser::parser::{Parser, ParserError};

use crate::config::SqlDialect;
use crate::extract::LineSpan;

/// A validated SQL candidate: original text plus its parse.
#[derive(Debug, Clone)]
pub struct ParsedQuery {
    pub text: String,
    pub statements: Vec<Statement>,
    pub is_select: bool,
    pub span: LineSpan,
}

/// Parses candidates against the configured dialect.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxValidator {
    dialect: SqlDialect,
}

impl SyntaxValidator {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect }
    }

    /// Returns the parsed query, or `None` when the candidate does not parse.
    pub fn validate(&self, text: &str, span: LineSpan) -> Option<ParsedQuery> {
        let statements = match self.parse(text) {
            Ok(statements) => statements,
            Err(err) => {
                tracing::debug!(error = %err, "candidate failed to parse, dropping");
                return None;
            }
        };
        if statements.is_empty() {
            return None;
        }

        let is_select = statements
            .iter()
            .all(|statement| matches!(statement, Statement::Query(_)));

        Some(ParsedQuery {
            text: text.to_string(),
            statements,
            is_select,
            span,
        })
    }

    fn parse(&self, sql: &str) -> Result<Vec<Statement>, ParserError> {
        match self.dialect {
            SqlDialect::Generic => Parser::parse_sql(&GenericDialect {}, sql),
            SqlDialect::Postgresql => Parser::parse_sql(&PostgreSqlDialect {}, sql),
            SqlDialect::Mysql => Parser::parse_sql(&MySqlDialect {}, sql),
            SqlDialect::Sqlite => Parser::parse_sql(&SQLiteDialect {}, sql),
            SqlDialect::Mssql => Parser::parse_sql(&MsSqlDialect {}, sql),
            SqlDialect::Hive => Parser::parse_sql(&HiveDialect {}, sql),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> SyntaxValidator {
        SyntaxValidator::new(SqlDialect::Generic)
    }

    #[test]
    fn valid_select_parses_and_is_flagged() {
        let parsed = validator()
            .validate("SELECT id FROM users WHERE id = 1", LineSpan::line(1))
            .unwrap();
        assert!(parsed.is_select);
        assert_eq!(parsed.statements.len(), 1);
    }

    #[test]
    fn update_is_not_a_select() {
        let parsed = validator()
            .validate("UPDATE users SET active = false", LineSpan::line(1))
            .unwrap();
        assert!(!parsed.is_select);
    }

    #[test]
    fn unparseable_candidates_are_dropped_silently() {
        assert!(validator()
            .validate("SELECT FROM WHERE ORDER", LineSpan::line(1))
            .is_none());
        assert!(validator()
            .validate("user logged in: SELECT-ish", LineSpan::line(1))
            .is_none());
    }

    #[test]
    fn empty_parse_yields_none() {
        assert!(validator().validate(";;", LineSpan::line(1)).is_none());
    }
}
