use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::watch;

use crate::entities::Snapshot;

/// Whole-document persistence for rooms and tenants.
///
/// Writes replace the entire snapshot; two writers racing on the same
/// document resolve as last-writer-wins.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn load(&self) -> Result<Snapshot, ServerError>;

    async fn save(&self, snapshot: &Snapshot) -> Result<(), ServerError>;

    /// Receives every snapshot saved after subscribing.
    fn subscribe(&self) -> watch::Receiver<Snapshot>;
}
