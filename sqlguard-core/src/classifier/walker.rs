//! Candidate discovery across the source root and auxiliary paths.

use std::path::Path;

use ignore::WalkBuilder;
use rustc_hash::FxHashSet;

use crate::config::AnalysisConfig;

use super::types::CandidateFile;
use super::classify;

/// Depth cap for pathological trees. Symlinks are never followed, so the
/// combination bounds traversal on any input.
const MAX_DEPTH: usize = 64;

/// Walks the configured roots and produces a deduplicated candidate list.
pub struct FileWalker<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> FileWalker<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Walk the source root, then each auxiliary path, unioning results.
    /// Deduplication is by absolute path, so overlapping roots are safe.
    pub fn discover(&self) -> Vec<CandidateFile> {
        let mut seen: FxHashSet<std::path::PathBuf> = FxHashSet::default();
        let mut candidates = Vec::new();

        self.walk_root(&self.config.source_root, &mut seen, &mut candidates);
        for root in self.config.auxiliary_roots() {
            self.walk_root(root, &mut seen, &mut candidates);
        }

        candidates
    }

    fn walk_root(
        &self,
        root: &Path,
        seen: &mut FxHashSet<std::path::PathBuf>,
        candidates: &mut Vec<CandidateFile>,
    ) {
        let walker = WalkBuilder::new(root)
            .follow_links(false)
            .max_depth(Some(MAX_DEPTH))
            .hidden(true)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(root = %root.display(), error = %err, "walk error, skipping entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let Some(category) = classify(entry.path()) else {
                continue;
            };

            let absolute = entry
                .path()
                .canonicalize()
                .unwrap_or_else(|_| entry.path().to_path_buf());
            if seen.insert(absolute.clone()) {
                candidates.push(CandidateFile {
                    path: absolute,
                    category,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::classifier::FileCategory;

    #[test]
    fn discovers_candidates_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("db").join("migrations");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("V1__init.sql"), "CREATE TABLE t (id INT);").unwrap();
        fs::write(dir.path().join("Repo.java"), "class Repo {}").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a candidate").unwrap();

        let config = AnalysisConfig::new(dir.path());
        let candidates = FileWalker::new(&config).discover();

        assert_eq!(candidates.len(), 2);
        assert!(candidates
            .iter()
            .any(|c| c.category == FileCategory::Sql && c.path.ends_with("V1__init.sql")));
        assert!(candidates.iter().any(|c| c.category == FileCategory::Code));
    }

    #[test]
    fn overlapping_roots_deduplicate_by_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        let migrations = dir.path().join("migrations");
        fs::create_dir_all(&migrations).unwrap();
        fs::write(migrations.join("V1__init.sql"), "CREATE TABLE t (id INT);").unwrap();

        // The migration dir is inside the source root and also listed as an
        // auxiliary path; the file must only appear once.
        let mut config = AnalysisConfig::new(dir.path());
        config.migration_paths.push(migrations);

        let candidates = FileWalker::new(&config).discover();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn missing_auxiliary_root_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("schema.sql"), "CREATE TABLE t (id INT);").unwrap();

        let mut config = AnalysisConfig::new(dir.path());
        config.schema_path = Some(dir.path().join("does-not-exist"));

        let candidates = FileWalker::new(&config).discover();
        assert_eq!(candidates.len(), 1);
    }
}
