use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::NaiveDate;
use fractic_server_error::ServerError;
use tokio::sync::watch;

use crate::{
    data::datasources::ron_datasource::{RonDatasource as _, RonDatasourceImpl},
    domain::{
        logic::{layout_builder::LayoutBuilder, occupancy_engine::OccupancyEngine},
        usecases::{
            occupancy_usecase::{OccupancyUsecase as _, OccupancyUsecaseImpl},
            report_usecase::{ReportUsecase as _, ReportUsecaseImpl},
        },
    },
    entities::{
        BedId, Clock, CollectionSheet, IdGenerator, LedgerConfig, MonthKey, MonthSummary,
        MutationOutcome, OccupancySummary, RentEditMode, RentStatement, RoomId, RoomLayout,
        Snapshot, SystemClock, TenantData, TenantId, TenantUpdate, UuidIdGenerator,
    },
    repositories::{JsonFileSnapshotRepository, SnapshotRepository},
};

/// Entry point for a collaborator (UI, API) managing one PG installation.
///
/// Every mutation loads the current snapshot from the repository, applies
/// the operation and writes the whole snapshot back, skipping the write when
/// nothing changed.
pub struct PgLedgerUtil<R: SnapshotRepository> {
    repository: Arc<R>,
    occupancy_usecase: OccupancyUsecaseImpl<R>,
    report_usecase: ReportUsecaseImpl<R>,
}

impl PgLedgerUtil<JsonFileSnapshotRepository> {
    /// Backed by a JSON document at `path`, seeded from `layout` on first
    /// use.
    pub fn open_json_file(path: impl Into<PathBuf>, layout: RoomLayout, config: LedgerConfig) -> Self {
        Self::new(JsonFileSnapshotRepository::new(path, layout), config)
    }
}

impl<R: SnapshotRepository> PgLedgerUtil<R> {
    pub fn new(repository: R, config: LedgerConfig) -> Self {
        Self::with_handlers(
            repository,
            config,
            Arc::new(UuidIdGenerator),
            Arc::new(SystemClock),
        )
    }

    pub fn with_handlers(
        repository: R,
        config: LedgerConfig,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let repository = Arc::new(repository);
        let config = Arc::new(config);
        Self {
            occupancy_usecase: OccupancyUsecaseImpl::new(
                Arc::clone(&repository),
                OccupancyEngine::new(ids, Arc::clone(&clock)),
            ),
            report_usecase: ReportUsecaseImpl::new(Arc::clone(&repository), clock, config),
            repository,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn snapshot(&self) -> Result<Snapshot, ServerError> {
        self.repository.load().await
    }

    /// Receives every snapshot saved from now on.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.repository.subscribe()
    }

    // Occupancy.
    // ---

    pub async fn book_bed(
        &self,
        room_id: &RoomId,
        bed_id: &BedId,
        data: TenantData,
    ) -> Result<MutationOutcome, ServerError> {
        self.occupancy_usecase.book_bed(room_id, bed_id, data).await
    }

    pub async fn book_room(
        &self,
        room_id: &RoomId,
        data: TenantData,
    ) -> Result<MutationOutcome, ServerError> {
        self.occupancy_usecase.book_room(room_id, data).await
    }

    pub async fn vacate_bed(
        &self,
        room_id: &RoomId,
        bed_id: &BedId,
        vacate_date: Option<NaiveDate>,
    ) -> Result<MutationOutcome, ServerError> {
        self.occupancy_usecase
            .vacate_bed(room_id, bed_id, vacate_date)
            .await
    }

    pub async fn vacate_room(
        &self,
        room_id: &RoomId,
        vacate_date: Option<NaiveDate>,
    ) -> Result<MutationOutcome, ServerError> {
        self.occupancy_usecase.vacate_room(room_id, vacate_date).await
    }

    pub async fn clear_bed(
        &self,
        room_id: &RoomId,
        bed_id: &BedId,
    ) -> Result<MutationOutcome, ServerError> {
        self.occupancy_usecase.clear_bed(room_id, bed_id).await
    }

    pub async fn clear_room(&self, room_id: &RoomId) -> Result<MutationOutcome, ServerError> {
        self.occupancy_usecase.clear_room(room_id).await
    }

    pub async fn update_tenant(
        &self,
        tenant_id: &TenantId,
        update: TenantUpdate,
    ) -> Result<MutationOutcome, ServerError> {
        self.occupancy_usecase.update_tenant(tenant_id, update).await
    }

    pub async fn edit_rent(
        &self,
        tenant_id: &TenantId,
        amount: f64,
        mode: RentEditMode,
    ) -> Result<MutationOutcome, ServerError> {
        self.occupancy_usecase.edit_rent(tenant_id, amount, mode).await
    }

    pub async fn toggle_rent_paid(
        &self,
        tenant_id: &TenantId,
        month: MonthKey,
    ) -> Result<MutationOutcome, ServerError> {
        self.occupancy_usecase.toggle_rent_paid(tenant_id, month).await
    }

    pub async fn set_rent_paid(
        &self,
        tenant_id: &TenantId,
        month: MonthKey,
        paid: bool,
    ) -> Result<MutationOutcome, ServerError> {
        self.occupancy_usecase
            .set_rent_paid(tenant_id, month, paid)
            .await
    }

    pub async fn set_default_rent(
        &self,
        room_id: &RoomId,
        bed_id: &BedId,
        default_rent: Option<f64>,
    ) -> Result<MutationOutcome, ServerError> {
        self.occupancy_usecase
            .set_default_rent(room_id, bed_id, default_rent)
            .await
    }

    // Reports.
    // ---

    /// Defaults to the current month.
    pub async fn collection_sheet(
        &self,
        month: Option<MonthKey>,
    ) -> Result<CollectionSheet, ServerError> {
        self.report_usecase.collection_sheet(month).await
    }

    pub async fn collection_history(&self) -> Result<Vec<MonthSummary>, ServerError> {
        self.report_usecase.collection_history().await
    }

    pub async fn occupancy(&self) -> Result<OccupancySummary, ServerError> {
        self.report_usecase.occupancy().await
    }

    pub async fn rent_statement(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Option<RentStatement>, ServerError> {
        self.report_usecase.rent_statement(tenant_id).await
    }

    pub async fn export_csv(&self) -> Result<String, ServerError> {
        self.report_usecase.export_csv().await
    }

    pub async fn write_export(&self, dir: &Path) -> Result<PathBuf, ServerError> {
        self.report_usecase.write_export(dir).await
    }
}

// Installation inputs.
// ---

/// Fresh snapshot for `layout`: every bed vacant, no tenants.
pub fn seed_snapshot(layout: &RoomLayout) -> Snapshot {
    LayoutBuilder::new(layout).build()
}

pub fn layout_from_ron(s: &str) -> Result<RoomLayout, ServerError> {
    RonDatasourceImpl::new().layout_from_string(s)
}

pub fn layout_from_file(path: impl AsRef<Path>) -> Result<RoomLayout, ServerError> {
    RonDatasourceImpl::new().layout_from_file(path)
}

pub fn config_from_ron(s: &str) -> Result<LedgerConfig, ServerError> {
    RonDatasourceImpl::new().config_from_string(s)
}

pub fn config_from_file(path: impl AsRef<Path>) -> Result<LedgerConfig, ServerError> {
    RonDatasourceImpl::new().config_from_file(path)
}

/// Decodes a stored snapshot document. Malformed dates and month keys load
/// as absent rather than failing.
pub fn snapshot_from_json(s: &str) -> Result<Snapshot, ServerError> {
    use crate::data::datasources::snapshot_json_datasource::{
        SnapshotJsonDatasource as _, SnapshotJsonDatasourceImpl,
    };
    SnapshotJsonDatasourceImpl::new().from_string(s)
}

pub fn snapshot_to_json(snapshot: &Snapshot) -> Result<String, ServerError> {
    use crate::data::datasources::snapshot_json_datasource::{
        SnapshotJsonDatasource as _, SnapshotJsonDatasourceImpl,
    };
    SnapshotJsonDatasourceImpl::new().to_string(snapshot)
}
