//! JSON snapshot persistence.
//!
//! All collections are written to a single file, `<data_dir>/devlink.json`.
//! Writes go to a temporary file in the same directory which is synced and
//! then renamed over the old snapshot, so readers never see a partial file.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use devlink_accounts::{AccountError, AccountStore, User};
use devlink_social::{SocialError, SocialSnapshot, SocialStore};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::api::AppState;
use crate::observability::RequestId;

/// Snapshot file name inside the data directory.
pub const SNAPSHOT_FILE: &str = "devlink.json";

/// Current snapshot format version.
const SNAPSHOT_VERSION: u32 = 1;

/// Errors reading or writing the snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot format error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot version {0}")]
    Version(u32),
    #[error(transparent)]
    Accounts(#[from] AccountError),
    #[error(transparent)]
    Social(#[from] SocialError),
}

/// On-disk content.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    #[serde(default)]
    users: Vec<User>,
    #[serde(flatten)]
    social: SocialSnapshot,
}

/// Snapshot file handle.
#[derive(Debug)]
pub struct Persistence {
    path: PathBuf,
    /// Serializes writers so an older snapshot never replaces a newer one.
    write_lock: Mutex<()>,
}

impl Persistence {
    /// Use `<data_dir>/devlink.json`.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(SNAPSHOT_FILE),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot into the stores. Returns false if no file exists.
    pub fn load(&self, accounts: &AccountStore, social: &SocialStore) -> Result<bool, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::Version(snapshot.version));
        }

        let users = snapshot.users.len();
        accounts.users.restore(snapshot.users)?;
        social.restore(snapshot.social)?;

        tracing::info!(path = %self.path.display(), users, "Snapshot loaded");
        Ok(true)
    }

    /// Write every collection to disk atomically.
    pub fn save(&self, accounts: &AccountStore, social: &SocialStore) -> Result<(), PersistenceError> {
        let _guard = self.write_lock.lock();

        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            users: accounts.users.list(),
            social: social.snapshot(),
        };
        let json = serde_json::to_vec_pretty(&snapshot)?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(path = %self.path.display(), bytes = json.len(), "Snapshot written");
        Ok(())
    }
}

/// Marks a response whose handler already flushed the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotFlushed;

/// Flush the snapshot after every successful mutating request.
pub async fn persist_after_write(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mutating = !matches!(
        *request.method(),
        Method::GET | Method::HEAD | Method::OPTIONS
    );

    let request_id = request.extensions().get::<RequestId>().cloned();

    let response = next.run(request).await;

    if !mutating
        || state.persistence.is_none()
        || !response.status().is_success()
        || response.extensions().get::<SnapshotFlushed>().is_some()
    {
        return response;
    }

    match state.flush().await {
        Ok(()) => response,
        Err(e) => {
            // The change is applied in memory but not on disk.
            tracing::error!(
                request_id = request_id.as_ref().map(|id| id.0.as_str()),
                error = %e,
                "Snapshot flush failed after write"
            );
            e.into_response()
        }
    }
}
