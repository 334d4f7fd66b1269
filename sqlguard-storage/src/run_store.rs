//! SQLite-backed run-record store.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use sqlguard_core::{
    AnalysisConfig, AnalysisMode, AnalysisRun, ReportLocation, ReportSummary, RunStatus, RunStore,
    StorageError,
};

use crate::connection::{self, sqlite_err};

/// `RunStore` over a single SQLite connection. The orchestrator is the only
/// writer, so a mutexed connection is all the discipline required.
pub struct SqliteRunStore {
    conn: Mutex<Connection>,
}

impl SqliteRunStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            conn: Mutex::new(connection::open(path)?),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            conn: Mutex::new(connection::open_in_memory()?),
        })
    }
}

impl RunStore for SqliteRunStore {
    fn create(
        &self,
        mode: AnalysisMode,
        config: AnalysisConfig,
    ) -> Result<AnalysisRun, StorageError> {
        let run = AnalysisRun::new(mode, config);
        let config_json = serde_json::to_string(&run.config).map_err(json_err)?;
        let summary_json = serde_json::to_string(&run.summary).map_err(json_err)?;

        let conn = self.conn.lock().expect("run store poisoned");
        conn.prepare_cached(
            "INSERT INTO analysis_runs
                 (id, mode, status, started_at, completed_at, config, summary,
                  report_container, report_key)
             VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6, NULL, NULL)",
        )
        .map_err(sqlite_err)?
        .execute(params![
            run.id.to_string(),
            run.mode.as_str(),
            run.status.as_str(),
            run.started_at.to_rfc3339(),
            config_json,
            summary_json,
        ])
        .map_err(sqlite_err)?;

        Ok(run)
    }

    fn load(&self, id: Uuid) -> Result<Option<AnalysisRun>, StorageError> {
        let conn = self.conn.lock().expect("run store poisoned");
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, mode, status, started_at, completed_at, config, summary,
                        report_container, report_key
                 FROM analysis_runs WHERE id = ?1",
            )
            .map_err(sqlite_err)?;

        let row = stmt
            .query_row(params![id.to_string()], |row| {
                Ok(RunRow {
                    id: row.get(0)?,
                    mode: row.get(1)?,
                    status: row.get(2)?,
                    started_at: row.get(3)?,
                    completed_at: row.get(4)?,
                    config: row.get(5)?,
                    summary: row.get(6)?,
                    report_container: row.get(7)?,
                    report_key: row.get(8)?,
                })
            })
            .optional()
            .map_err(sqlite_err)?;

        row.map(RunRow::into_run).transpose()
    }

    fn save(&self, run: &AnalysisRun) -> Result<(), StorageError> {
        let config_json = serde_json::to_string(&run.config).map_err(json_err)?;
        let summary_json = serde_json::to_string(&run.summary).map_err(json_err)?;
        let (container, key) = match &run.report_ref {
            Some(location) => (Some(location.container.clone()), Some(location.key.clone())),
            None => (None, None),
        };

        let conn = self.conn.lock().expect("run store poisoned");
        let updated = conn
            .prepare_cached(
                "UPDATE analysis_runs
                 SET mode = ?2, status = ?3, started_at = ?4, completed_at = ?5,
                     config = ?6, summary = ?7, report_container = ?8, report_key = ?9
                 WHERE id = ?1",
            )
            .map_err(sqlite_err)?
            .execute(params![
                run.id.to_string(),
                run.mode.as_str(),
                run.status.as_str(),
                run.started_at.to_rfc3339(),
                run.completed_at.map(|t| t.to_rfc3339()),
                config_json,
                summary_json,
                container,
                key,
            ])
            .map_err(sqlite_err)?;

        if updated == 0 {
            return Err(StorageError::NotFound { id: run.id });
        }
        Ok(())
    }
}

/// Raw row shape before decoding.
struct RunRow {
    id: String,
    mode: String,
    status: String,
    started_at: String,
    completed_at: Option<String>,
    config: String,
    summary: String,
    report_container: Option<String>,
    report_key: Option<String>,
}

impl RunRow {
    fn into_run(self) -> Result<AnalysisRun, StorageError> {
        let id = Uuid::parse_str(&self.id).map_err(|e| corrupt("id", &e.to_string()))?;
        let mode = AnalysisMode::parse(&self.mode)
            .ok_or_else(|| corrupt("mode", &self.mode))?;
        let status = RunStatus::parse(&self.status)
            .ok_or_else(|| corrupt("status", &self.status))?;
        let started_at = chrono::DateTime::parse_from_rfc3339(&self.started_at)
            .map_err(|e| corrupt("started_at", &e.to_string()))?
            .with_timezone(&chrono::Utc);
        let completed_at = self
            .completed_at
            .map(|raw| {
                chrono::DateTime::parse_from_rfc3339(&raw)
                    .map(|t| t.with_timezone(&chrono::Utc))
                    .map_err(|e| corrupt("completed_at", &e.to_string()))
            })
            .transpose()?;
        let config: AnalysisConfig = serde_json::from_str(&self.config).map_err(json_err)?;
        let summary: ReportSummary = serde_json::from_str(&self.summary).map_err(json_err)?;
        let report_ref = match (self.report_container, self.report_key) {
            (Some(container), Some(key)) => Some(ReportLocation { container, key }),
            _ => None,
        };

        Ok(AnalysisRun {
            id,
            mode,
            status,
            started_at,
            completed_at,
            config,
            summary,
            report_ref,
        })
    }
}

fn corrupt(field: &str, detail: &str) -> StorageError {
    StorageError::Sqlite {
        message: format!("corrupt run record field `{field}`: {detail}"),
    }
}

fn json_err(err: serde_json::Error) -> StorageError {
    StorageError::Sqlite {
        message: format!("run record JSON column: {err}"),
    }
}
