//! Run configuration: dialect, mode, and the paths an analysis covers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// SQL dialect used for syntactic validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SqlDialect {
    #[default]
    Generic,
    Postgresql,
    Mysql,
    Sqlite,
    Mssql,
    Hive,
}

impl SqlDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "GENERIC",
            Self::Postgresql => "POSTGRESQL",
            Self::Mysql => "MYSQL",
            Self::Sqlite => "SQLITE",
            Self::Mssql => "MSSQL",
            Self::Hive => "HIVE",
        }
    }
}

/// Analysis mode. Only static analysis is implemented; requesting
/// `Dynamic` fails the run with `AnalysisError::UnsupportedMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisMode {
    #[default]
    Static,
    Dynamic,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "STATIC",
            Self::Dynamic => "DYNAMIC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "STATIC" => Some(Self::Static),
            "DYNAMIC" => Some(Self::Dynamic),
            _ => None,
        }
    }
}

impl std::fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration embedded in every analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Dialect candidates are parsed against.
    #[serde(default)]
    pub dialect: SqlDialect,
    /// Root directory of the source tree.
    pub source_root: PathBuf,
    /// Extra migration directories walked in addition to the root.
    #[serde(default)]
    pub migration_paths: Vec<PathBuf>,
    /// Optional schema directory.
    #[serde(default)]
    pub schema_path: Option<PathBuf>,
    /// Optional code directory outside the source root.
    #[serde(default)]
    pub code_path: Option<PathBuf>,
}

impl AnalysisConfig {
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            dialect: SqlDialect::default(),
            source_root: source_root.into(),
            migration_paths: Vec::new(),
            schema_path: None,
            code_path: None,
        }
    }

    /// Auxiliary roots walked independently of the source root.
    pub fn auxiliary_roots(&self) -> Vec<&Path> {
        let mut roots: Vec<&Path> = self.migration_paths.iter().map(PathBuf::as_path).collect();
        if let Some(ref schema) = self.schema_path {
            roots.push(schema);
        }
        if let Some(ref code) = self.code_path {
            roots.push(code);
        }
        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auxiliary_roots_collects_all_optional_paths() {
        let mut config = AnalysisConfig::new("/srv/app");
        assert!(config.auxiliary_roots().is_empty());

        config.migration_paths.push(PathBuf::from("/srv/app/db/migrations"));
        config.schema_path = Some(PathBuf::from("/srv/app/db/schema"));
        config.code_path = Some(PathBuf::from("/srv/app/src"));
        assert_eq!(config.auxiliary_roots().len(), 3);
    }

    #[test]
    fn mode_round_trips_through_wire_name() {
        assert_eq!(AnalysisMode::parse("STATIC"), Some(AnalysisMode::Static));
        assert_eq!(AnalysisMode::parse("DYNAMIC"), Some(AnalysisMode::Dynamic));
        assert_eq!(AnalysisMode::parse("static"), None);
        assert_eq!(AnalysisMode::Static.as_str(), "STATIC");
    }

    #[test]
    fn dialect_serializes_screaming_snake() {
        let json = serde_json::to_string(&SqlDialect::Postgresql).unwrap();
        assert_eq!(json, "\"POSTGRESQL\"");
    }
}
