use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::watch;

use crate::{
    domain::{
        logic::layout_builder::LayoutBuilder, repositories::snapshot_repository::SnapshotRepository,
    },
    entities::{RoomLayout, Snapshot},
};

/// Keeps the snapshot in memory. Deterministic stand-in for a real store.
pub struct InMemorySnapshotRepository {
    current: watch::Sender<Snapshot>,
    saves: AtomicUsize,
}

impl InMemorySnapshotRepository {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            current: watch::Sender::new(initial),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn seeded(layout: &RoomLayout) -> Self {
        Self::new(LayoutBuilder::new(layout).build())
    }

    /// Number of completed `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    async fn load(&self) -> Result<Snapshot, ServerError> {
        Ok(self.current.borrow().clone())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), ServerError> {
        self.current.send_replace(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.current.subscribe()
    }
}
