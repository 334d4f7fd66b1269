//! Filesystem artifact store with signed, expiring read URLs.
//!
//! Artifacts are content-addressed: the key is the xxh3 hash of the bytes
//! plus an extension derived from the content type. Signed URLs embed an
//! expiry timestamp and a keyed-hash token; `verify_url` checks both. The
//! token keeps casual tampering out of logs and relayed links; transport
//! security remains the deployment's concern.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use xxhash_rust::xxh3::xxh3_64;

use sqlguard_core::{ArtifactStore, ReportLocation, StorageError};

/// Container name for report artifacts.
const REPORTS_CONTAINER: &str = "reports";

pub struct FsArtifactStore {
    root: PathBuf,
    signing_key: u64,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>, signing_key: u64) -> Self {
        Self {
            root: root.into(),
            signing_key,
        }
    }

    fn object_path(&self, location: &ReportLocation) -> PathBuf {
        self.root.join(&location.container).join(&location.key)
    }

    /// Reads a stored artifact back; used by callers that serve the bytes
    /// themselves instead of redirecting to the URL.
    pub fn read(&self, location: &ReportLocation) -> Result<Vec<u8>, StorageError> {
        fs::read(self.object_path(location)).map_err(io_err)
    }

    /// Validates a URL minted by `signed_url`: signature intact, not expired.
    pub fn verify_url(&self, url: &str) -> bool {
        let Some((base, query)) = url.split_once('?') else {
            return false;
        };
        let Some(relative) = base.strip_prefix("artifact://") else {
            return false;
        };
        let mut expires: Option<i64> = None;
        let mut signature: Option<&str> = None;
        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("expires", value)) => expires = value.parse().ok(),
                Some(("sig", value)) => signature = Some(value),
                _ => {}
            }
        }
        let (Some(expires), Some(signature)) = (expires, signature) else {
            return false;
        };
        if Utc::now().timestamp() >= expires {
            return false;
        }
        signature == self.sign(relative, expires)
    }

    fn sign(&self, relative: &str, expires: i64) -> String {
        let token = xxh3_64(format!("{relative}:{expires}:{}", self.signing_key).as_bytes());
        URL_SAFE_NO_PAD.encode(token.to_be_bytes())
    }
}

impl ArtifactStore for FsArtifactStore {
    fn store(&self, bytes: &[u8], content_type: &str) -> Result<ReportLocation, StorageError> {
        let extension = match content_type {
            "application/json" => "json",
            "text/plain" => "txt",
            _ => "bin",
        };
        let key = format!("{:016x}.{extension}", xxh3_64(bytes));
        let location = ReportLocation {
            container: REPORTS_CONTAINER.to_string(),
            key,
        };

        let path = self.object_path(&location);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&path, bytes).map_err(io_err)?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "stored artifact");

        Ok(location)
    }

    fn signed_url(
        &self,
        location: &ReportLocation,
        ttl: Duration,
    ) -> Result<String, StorageError> {
        let relative = format!("{}/{}", location.container, location.key);
        let expires = Utc::now().timestamp() + ttl.as_secs() as i64;
        let signature = self.sign(&relative, expires);
        Ok(format!(
            "artifact://{relative}?expires={expires}&sig={signature}"
        ))
    }
}

fn io_err(err: std::io::Error) -> StorageError {
    StorageError::Io {
        message: err.to_string(),
    }
}
