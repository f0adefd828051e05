use std::path::PathBuf;

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::watch;
use tracing::info;

use crate::{
    data::datasources::snapshot_json_datasource::{
        SnapshotJsonDatasource, SnapshotJsonDatasourceImpl,
    },
    domain::{
        logic::layout_builder::LayoutBuilder, repositories::snapshot_repository::SnapshotRepository,
    },
    entities::{RoomLayout, Snapshot},
};

/// Stores the whole snapshot as one JSON document on disk. The first load
/// of a missing file seeds it from the room layout.
pub struct JsonFileSnapshotRepository {
    path: PathBuf,
    layout: RoomLayout,
    datasource: SnapshotJsonDatasourceImpl,
    updates: watch::Sender<Snapshot>,
}

impl JsonFileSnapshotRepository {
    pub fn new(path: impl Into<PathBuf>, layout: RoomLayout) -> Self {
        Self {
            path: path.into(),
            layout,
            datasource: SnapshotJsonDatasourceImpl::new(),
            updates: watch::Sender::new(Snapshot::default()),
        }
    }
}

#[async_trait]
impl SnapshotRepository for JsonFileSnapshotRepository {
    async fn load(&self) -> Result<Snapshot, ServerError> {
        if let Some(snapshot) = self.datasource.from_file(&self.path).await? {
            self.updates.send_replace(snapshot.clone());
            return Ok(snapshot);
        }
        info!(path = %self.path.display(), "no snapshot on disk; seeding from room layout");
        let seeded = LayoutBuilder::new(&self.layout).build();
        self.save(&seeded).await?;
        Ok(seeded)
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), ServerError> {
        self.datasource.to_file(&self.path, snapshot).await?;
        self.updates.send_replace(snapshot.clone());
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.updates.subscribe()
    }
}
