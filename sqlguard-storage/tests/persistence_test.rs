//! Full pipeline against the real storage backends.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use sqlguard_core::{AnalysisConfig, AnalysisMode, Analyzer, EventDispatcher, RunStatus, RunStore};
use sqlguard_storage::{FsArtifactStore, SqliteRunStore};

#[test]
fn analysis_persists_through_sqlite_and_filesystem() {
    let source = tempfile::tempdir().unwrap();
    fs::write(
        source.path().join("patch.sql"),
        "UPDATE users SET active = false;\nSELECT * FROM users WHERE id = 1;\n",
    )
    .unwrap();

    let storage_dir = tempfile::tempdir().unwrap();
    let runs = Arc::new(SqliteRunStore::open(&storage_dir.path().join("runs.db")).unwrap());
    let artifacts = Arc::new(FsArtifactStore::new(storage_dir.path().join("blobs"), 0x5eed));

    let analyzer = Analyzer::new(runs.clone(), artifacts.clone(), EventDispatcher::new());
    let config = AnalysisConfig::new(source.path());
    let run = runs.create(AnalysisMode::Static, config.clone()).unwrap();
    let finished = analyzer.analyze(run.id, &config).unwrap();

    // Record round-trips from SQLite with its terminal state.
    let stored = runs.load(run.id).unwrap().unwrap();
    assert_eq!(stored.status, RunStatus::Completed);
    assert_eq!(stored.summary, finished.summary);
    assert!(stored.summary.total_issues >= 2);

    // The machine-readable artifact is readable and well-formed JSON.
    let location = stored.report_ref.unwrap();
    let bytes = artifacts.read(&location).unwrap();
    let report: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report["status"], "COMPLETED");
    assert_eq!(
        report["summary"]["total_issues"].as_u64().unwrap() as usize,
        stored.summary.total_issues
    );

    // A signed URL for it verifies within its lifetime.
    let url = sqlguard_core::ArtifactStore::signed_url(
        artifacts.as_ref(),
        &location,
        Duration::from_secs(15 * 60),
    )
    .unwrap();
    assert!(artifacts.verify_url(&url));
}
