use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tracing::info;

use crate::{
    domain::{
        logic::{
            collections_aggregator::CollectionsAggregator, period::current_month_key,
            rent_ledger::RentLedger,
        },
        repositories::snapshot_repository::SnapshotRepository,
    },
    entities::{
        Clock, CollectionSheet, LedgerConfig, MonthKey, MonthSummary, OccupancySummary,
        RentStatement, TenantId,
    },
    errors::{BackgroundTaskFailed, WriteError},
    presentation::csv_exporter::{export_filename, CsvExporter},
};

/// UTF-8 byte order mark, so spreadsheet tools pick the right encoding.
const BOM: &str = "\u{FEFF}";

/// Read-side projections over the persisted snapshot.
#[async_trait]
pub trait ReportUsecase: Send + Sync {
    async fn collection_sheet(&self, month: Option<MonthKey>) -> Result<CollectionSheet, ServerError>;

    async fn collection_history(&self) -> Result<Vec<MonthSummary>, ServerError>;

    async fn occupancy(&self) -> Result<OccupancySummary, ServerError>;

    /// None if the tenant does not exist.
    async fn rent_statement(&self, tenant_id: &TenantId)
        -> Result<Option<RentStatement>, ServerError>;

    async fn export_csv(&self) -> Result<String, ServerError>;

    /// Writes the export into `dir` under its dated file name and returns
    /// the full path.
    async fn write_export(&self, dir: &Path) -> Result<PathBuf, ServerError>;
}

pub(crate) struct ReportUsecaseImpl<R: SnapshotRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    config: Arc<LedgerConfig>,
}

impl<R: SnapshotRepository> ReportUsecaseImpl<R> {
    pub(crate) fn new(repository: Arc<R>, clock: Arc<dyn Clock>, config: Arc<LedgerConfig>) -> Self {
        Self {
            repository,
            clock,
            config,
        }
    }
}

#[async_trait]
impl<R: SnapshotRepository> ReportUsecase for ReportUsecaseImpl<R> {
    async fn collection_sheet(&self, month: Option<MonthKey>) -> Result<CollectionSheet, ServerError> {
        let snapshot = self.repository.load().await?;
        let month = month.unwrap_or_else(|| current_month_key(self.clock.as_ref()));
        Ok(CollectionsAggregator::sheet(&snapshot.tenants, month))
    }

    async fn collection_history(&self) -> Result<Vec<MonthSummary>, ServerError> {
        let snapshot = self.repository.load().await?;
        Ok(CollectionsAggregator::history(
            &snapshot.tenants,
            current_month_key(self.clock.as_ref()),
        ))
    }

    async fn occupancy(&self) -> Result<OccupancySummary, ServerError> {
        let snapshot = self.repository.load().await?;
        Ok(CollectionsAggregator::occupancy(&snapshot.rooms))
    }

    async fn rent_statement(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Option<RentStatement>, ServerError> {
        let snapshot = self.repository.load().await?;
        let current = current_month_key(self.clock.as_ref());
        Ok(snapshot
            .tenant(tenant_id)
            .map(|t| RentLedger::statement(t, current, self.config.lookahead_months)))
    }

    async fn export_csv(&self) -> Result<String, ServerError> {
        let snapshot = self.repository.load().await?;
        let config = Arc::clone(&self.config);
        let today = self.clock.today();
        // O(tenants x months); keep it off the caller's thread.
        tokio::task::spawn_blocking(move || CsvExporter::new(&config).generate(&snapshot, today))
            .await
            .map_err(|e| BackgroundTaskFailed::with_debug("csv export", &e))?
    }

    async fn write_export(&self, dir: &Path) -> Result<PathBuf, ServerError> {
        let csv = self.export_csv().await?;
        let path = dir.join(export_filename(&self.config.export_prefix, self.clock.today()));
        tokio::fs::write(&path, format!("{}{}", BOM, csv))
            .await
            .map_err(|e| WriteError::with_debug(&path.display().to_string(), &e))?;
        info!(path = %path.display(), "export written");
        Ok(path)
    }
}
