//! File classifier - decides which files are analysis candidates and why.
//!
//! Classification is extension-driven: SQL files, supported source-code
//! languages, and structured config formats. A fixed database-related name
//! vocabulary also qualifies code/config files; since every such extension
//! already qualifies on its own, the vocabulary is exposed for callers that
//! need the narrower signal.

mod types;
mod walker;

use std::path::Path;

pub use types::{CandidateFile, FileCategory};
pub use walker::FileWalker;

/// Extensions treated as SQL files, including dialect-specific variants.
const SQL_EXTENSIONS: &[&str] = &["sql", "ddl", "dml", "psql", "plsql", "tsql", "hql"];

/// Extensions of supported source-code languages.
const CODE_EXTENSIONS: &[&str] = &[
    "java", "kt", "scala", "groovy", "py", "rb", "php", "js", "ts", "go", "cs", "rs",
];

/// Structured-config extensions subject to the keyword line scan.
const CONFIG_EXTENSIONS: &[&str] = &["yml", "yaml", "xml", "properties", "conf", "cfg"];

/// Name vocabulary that marks a code/config file as database-related.
const NAME_VOCABULARY: &[&str] = &[
    "migration",
    "schema",
    "database",
    "entity",
    "repository",
    "dao",
    "hibernate",
    "jpa",
];

/// Classifies a path into a candidate category, or `None` if the file is
/// not an analysis candidate.
pub fn classify(path: &Path) -> Option<FileCategory> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();

    if SQL_EXTENSIONS.contains(&ext.as_str()) {
        return Some(FileCategory::Sql);
    }
    if CODE_EXTENSIONS.contains(&ext.as_str()) {
        return Some(FileCategory::Code);
    }
    if CONFIG_EXTENSIONS.contains(&ext.as_str()) {
        return Some(FileCategory::Config);
    }
    None
}

/// Returns `true` when the file name (case-insensitive) contains one of the
/// database-related vocabulary words.
pub fn name_suggests_database(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n.to_ascii_lowercase(),
        None => return false,
    };
    NAME_VOCABULARY.iter().any(|word| name.contains(word))
}
