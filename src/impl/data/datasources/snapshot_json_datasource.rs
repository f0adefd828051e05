use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    data::models::snapshot_model::SnapshotModel,
    entities::Snapshot,
    errors::{InvalidJson, InvalidSnapshot, ReadError, WriteError},
};

#[async_trait]
pub(crate) trait SnapshotJsonDatasource: Send + Sync {
    fn from_string(&self, s: &str) -> Result<Snapshot, ServerError>;

    fn to_string(&self, snapshot: &Snapshot) -> Result<String, ServerError>;

    /// Ok(None) if the file does not exist yet.
    async fn from_file(&self, path: &Path) -> Result<Option<Snapshot>, ServerError>;

    async fn to_file(&self, path: &Path, snapshot: &Snapshot) -> Result<(), ServerError>;
}

pub(crate) struct SnapshotJsonDatasourceImpl;

impl SnapshotJsonDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SnapshotJsonDatasource for SnapshotJsonDatasourceImpl {
    fn from_string(&self, s: &str) -> Result<Snapshot, ServerError> {
        let model: SnapshotModel =
            serde_json::from_str(s).map_err(|e| InvalidJson::with_debug("Snapshot", &e))?;
        Ok(model.into())
    }

    fn to_string(&self, snapshot: &Snapshot) -> Result<String, ServerError> {
        serde_json::to_string_pretty(&SnapshotModel::from(snapshot))
            .map_err(|e| InvalidSnapshot::with_debug(&e))
    }

    async fn from_file(&self, path: &Path) -> Result<Option<Snapshot>, ServerError> {
        match tokio::fs::read_to_string(path).await {
            Ok(s) => self.from_string(&s).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ReadError::with_debug(&e)),
        }
    }

    /// Writes a sibling temporary file and renames it over `path`, so the
    /// stored document is either the previous or the new one in full.
    async fn to_file(&self, path: &Path, snapshot: &Snapshot) -> Result<(), ServerError> {
        let s = self.to_string(snapshot)?;
        let staging = staging_path(path);
        let written = match tokio::fs::write(&staging, s).await {
            Ok(()) => tokio::fs::rename(&staging, path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(WriteError::with_debug(&path.display().to_string(), &e));
        }
        Ok(())
    }
}

/// `{path}.tmp`, in the same directory so the rename stays on one
/// filesystem.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    PathBuf::from(staging)
}
