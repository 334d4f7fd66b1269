//! End-to-end pipeline tests over real temp directories and in-memory stores.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use sqlguard_core::stores::memory::{MemoryArtifactStore, MemoryRunStore};
use sqlguard_core::{
    AnalysisConfig, AnalysisError, AnalysisMode, AnalysisReport, AnalysisRun, Analyzer,
    EventDispatcher, RunStatus, RunStore, Severity, Technique,
};

struct Harness {
    runs: Arc<MemoryRunStore>,
    artifacts: Arc<MemoryArtifactStore>,
    analyzer: Analyzer,
}

fn harness() -> Harness {
    harness_with_events(EventDispatcher::new())
}

fn harness_with_events(events: EventDispatcher) -> Harness {
    let runs = Arc::new(MemoryRunStore::new());
    let artifacts = Arc::new(MemoryArtifactStore::new());
    let analyzer = Analyzer::new(runs.clone(), artifacts.clone(), events);
    Harness {
        runs,
        artifacts,
        analyzer,
    }
}

fn run_over(harness: &Harness, root: &Path) -> Result<AnalysisRun, AnalysisError> {
    let config = AnalysisConfig::new(root);
    let run = harness
        .runs
        .create(AnalysisMode::Static, config.clone())
        .unwrap();
    harness.analyzer.analyze(run.id, &config)
}

fn fetch_report(harness: &Harness, run: &AnalysisRun) -> AnalysisReport {
    let location = run.report_ref.as_ref().expect("completed run has a report ref");
    let bytes = harness.artifacts.get(location).expect("artifact exists");
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn counts_files_and_queries_per_contract() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("patch.sql"),
        "UPDATE users SET active = false;\nSELECT id FROM users WHERE id = 1;\n",
    )
    .unwrap();
    // A code file with no matching patterns contributes nothing.
    fs::write(
        dir.path().join("Service.java"),
        "public class Service { int add(int a, int b) { return a + b; } }\n",
    )
    .unwrap();

    let harness = harness();
    let run = run_over(&harness, dir.path()).unwrap();

    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.summary.files_analyzed, 1);
    assert_eq!(run.summary.queries_analyzed, 2);
    assert_eq!(
        run.summary.total_issues,
        run.summary.critical_issues + run.summary.warning_issues + run.summary.info_issues
    );
}

#[test]
fn missing_where_is_reported_critical_with_full_confidence() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("patch.sql"), "UPDATE users SET active=false;\n").unwrap();

    let harness = harness();
    let run = run_over(&harness, dir.path()).unwrap();
    let report = fetch_report(&harness, &run);

    let matches: Vec<_> = report
        .issues
        .iter()
        .filter(|issue| issue.technique == Technique::MissingWhereClause)
        .collect();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].severity, Severity::Critical);
    assert_eq!(matches[0].confidence, 1.0);
    assert!(matches[0].location.as_ref().unwrap().file.ends_with("patch.sql"));
}

#[test]
fn select_star_fires_in_main_but_not_in_test_paths() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("src").join("main");
    let test = dir.path().join("src").join("test");
    fs::create_dir_all(&main).unwrap();
    fs::create_dir_all(&test).unwrap();
    fs::write(main.join("report.sql"), "SELECT * FROM users WHERE id = 1;\n").unwrap();
    fs::write(test.join("fixture.sql"), "SELECT * FROM users WHERE id = 1;\n").unwrap();

    let harness = harness();
    let run = run_over(&harness, dir.path()).unwrap();
    let report = fetch_report(&harness, &run);

    let star_issues: Vec<_> = report
        .issues
        .iter()
        .filter(|issue| issue.technique == Technique::SelectStarUsage)
        .collect();
    assert_eq!(star_issues.len(), 1);
    assert!(star_issues[0]
        .location
        .as_ref()
        .unwrap()
        .file
        .contains("/main/"));
}

#[test]
fn comma_join_yields_one_cartesian_critical() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("report.sql"),
        "SELECT u.name, o.total FROM users u, orders o WHERE u.active = true;\n",
    )
    .unwrap();

    let harness = harness();
    let run = run_over(&harness, dir.path()).unwrap();
    let report = fetch_report(&harness, &run);

    let cartesian: Vec<_> = report
        .issues
        .iter()
        .filter(|issue| issue.technique == Technique::PotentialCartesianJoin)
        .collect();
    assert_eq!(cartesian.len(), 1);
    assert_eq!(cartesian[0].severity, Severity::Critical);
}

#[test]
fn structural_orm_risks_flow_through_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Order.java"),
        "@Entity\npublic class Order {\n    @OneToMany(mappedBy = \"order\")\n    private List<Item> items;\n}\n",
    )
    .unwrap();

    let harness = harness();
    let run = run_over(&harness, dir.path()).unwrap();
    let report = fetch_report(&harness, &run);

    assert!(report
        .issues
        .iter()
        .any(|issue| issue.technique == Technique::NPlusOneRisk));
    // The structural candidate counts as an analyzed query.
    assert!(run.summary.queries_analyzed >= 1);
}

#[test]
fn both_report_representations_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("q.sql"), "SELECT * FROM users WHERE id = 1;\n").unwrap();

    let harness = harness();
    let run = run_over(&harness, dir.path()).unwrap();

    assert_eq!(harness.artifacts.object_count(), 2);
    let stored = harness.runs.load(run.id).unwrap().unwrap();
    assert_eq!(stored.status, RunStatus::Completed);
    assert_eq!(stored.report_ref, run.report_ref);
    // The run record points at the machine-readable representation.
    assert!(stored.report_ref.unwrap().key.ends_with(".json"));
}

#[test]
fn json_summary_matches_run_summary() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("mixed.sql"),
        "SELECT * FROM users WHERE id = 1;\nDELETE FROM sessions;\n",
    )
    .unwrap();

    let harness = harness();
    let run = run_over(&harness, dir.path()).unwrap();
    let report = fetch_report(&harness, &run);

    assert_eq!(report.summary, run.summary);
    assert_eq!(report.run_id, run.id);
    assert_eq!(report.status, RunStatus::Completed);
}

#[test]
fn empty_tree_fails_the_run_without_a_report() {
    let dir = tempfile::tempdir().unwrap();

    let harness = harness();
    let err = run_over(&harness, dir.path()).unwrap_err();
    assert!(matches!(err, AnalysisError::NoCandidateFiles { .. }));
    assert_eq!(harness.artifacts.object_count(), 0);
}

#[test]
fn failed_runs_are_persisted_as_failed() {
    let dir = tempfile::tempdir().unwrap();

    let harness = harness();
    let config = AnalysisConfig::new(dir.path());
    let run = harness
        .runs
        .create(AnalysisMode::Static, config.clone())
        .unwrap();
    let _ = harness.analyzer.analyze(run.id, &config).unwrap_err();

    let stored = harness.runs.load(run.id).unwrap().unwrap();
    assert_eq!(stored.status, RunStatus::Failed);
    assert!(stored.report_ref.is_none());
    assert!(stored.completed_at.is_some());
}

#[test]
fn dynamic_mode_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("q.sql"), "SELECT 1;\n").unwrap();

    let harness = harness();
    let config = AnalysisConfig::new(dir.path());
    let run = harness
        .runs
        .create(AnalysisMode::Dynamic, config.clone())
        .unwrap();
    let err = harness.analyzer.analyze(run.id, &config).unwrap_err();
    assert!(matches!(err, AnalysisError::UnsupportedMode));

    let stored = harness.runs.load(run.id).unwrap().unwrap();
    assert_eq!(stored.status, RunStatus::Failed);
}

#[test]
fn unknown_run_id_is_an_error() {
    let harness = harness();
    let config = AnalysisConfig::new("/nonexistent");
    let err = harness
        .analyzer
        .analyze(uuid::Uuid::new_v4(), &config)
        .unwrap_err();
    assert!(matches!(err, AnalysisError::RunNotFound { .. }));
}

#[test]
fn detection_is_deterministic_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("mixed.sql"),
        "SELECT * FROM users u, orders o WHERE u.active = true;\nDELETE FROM sessions;\n",
    )
    .unwrap();

    let harness = harness();
    let first = run_over(&harness, dir.path()).unwrap();
    let second = run_over(&harness, dir.path()).unwrap();

    let mut techniques_first: Vec<_> = fetch_report(&harness, &first)
        .issues
        .iter()
        .map(|issue| (issue.technique, issue.severity))
        .collect();
    let mut techniques_second: Vec<_> = fetch_report(&harness, &second)
        .issues
        .iter()
        .map(|issue| (issue.technique, issue.severity))
        .collect();
    techniques_first.sort_by_key(|(t, _)| t.as_str());
    techniques_second.sort_by_key(|(t, _)| t.as_str());
    assert_eq!(techniques_first, techniques_second);
}

#[derive(Default)]
struct Recording {
    names: Mutex<Vec<&'static str>>,
}

impl sqlguard_core::AnalysisEventHandler for Recording {
    fn on_run_started(&self, _event: &sqlguard_core::events::RunStartedEvent) {
        self.names.lock().unwrap().push("run_started");
    }
    fn on_files_discovered(&self, _event: &sqlguard_core::events::FilesDiscoveredEvent) {
        self.names.lock().unwrap().push("files_discovered");
    }
    fn on_report_persisted(&self, _event: &sqlguard_core::events::ReportPersistedEvent) {
        self.names.lock().unwrap().push("report_persisted");
    }
    fn on_run_completed(&self, _event: &sqlguard_core::events::RunCompletedEvent) {
        self.names.lock().unwrap().push("run_completed");
    }
}

#[test]
fn lifecycle_events_fire_in_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("q.sql"), "SELECT id FROM users WHERE id = 1;\n").unwrap();

    let recording = Arc::new(Recording::default());
    let mut events = EventDispatcher::new();
    events.register(recording.clone());

    let harness = harness_with_events(events);
    run_over(&harness, dir.path()).unwrap();

    let names = recording.names.lock().unwrap().clone();
    assert_eq!(
        names,
        vec![
            "run_started",
            "files_discovered",
            "report_persisted",
            "run_completed"
        ]
    );
}
