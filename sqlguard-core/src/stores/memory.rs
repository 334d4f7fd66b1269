//! In-memory store implementations for tests and embedding.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use uuid::Uuid;

use crate::config::{AnalysisConfig, AnalysisMode};
use crate::errors::StorageError;
use crate::run::{AnalysisRun, ReportLocation};

use super::{ArtifactStore, RunStore};

/// `RunStore` backed by a mutexed map.
#[derive(Default)]
pub struct MemoryRunStore {
    runs: Mutex<HashMap<Uuid, AnalysisRun>>,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunStore for MemoryRunStore {
    fn create(
        &self,
        mode: AnalysisMode,
        config: AnalysisConfig,
    ) -> Result<AnalysisRun, StorageError> {
        let run = AnalysisRun::new(mode, config);
        self.runs
            .lock()
            .expect("run store poisoned")
            .insert(run.id, run.clone());
        Ok(run)
    }

    fn load(&self, id: Uuid) -> Result<Option<AnalysisRun>, StorageError> {
        Ok(self.runs.lock().expect("run store poisoned").get(&id).cloned())
    }

    fn save(&self, run: &AnalysisRun) -> Result<(), StorageError> {
        let mut runs = self.runs.lock().expect("run store poisoned");
        if !runs.contains_key(&run.id) {
            return Err(StorageError::NotFound { id: run.id });
        }
        runs.insert(run.id, run.clone());
        Ok(())
    }
}

/// `ArtifactStore` keeping blobs in memory, keyed by a counter.
#[derive(Default)]
pub struct MemoryArtifactStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().expect("artifact store poisoned").len()
    }

    pub fn get(&self, location: &ReportLocation) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("artifact store poisoned")
            .get(&location.key)
            .cloned()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn store(&self, bytes: &[u8], content_type: &str) -> Result<ReportLocation, StorageError> {
        let mut objects = self.objects.lock().expect("artifact store poisoned");
        let extension = if content_type == "application/json" {
            "json"
        } else {
            "txt"
        };
        let key = format!("{}.{extension}", objects.len());
        objects.insert(key.clone(), bytes.to_vec());
        Ok(ReportLocation {
            container: "memory".to_string(),
            key,
        })
    }

    fn signed_url(
        &self,
        location: &ReportLocation,
        ttl: Duration,
    ) -> Result<String, StorageError> {
        Ok(format!(
            "memory://{}/{}?ttl={}",
            location.container,
            location.key,
            ttl.as_secs()
        ))
    }
}
