use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use fractic_server_error::ServerError;
use tracing::debug;

use crate::{
    domain::{
        logic::occupancy_engine::OccupancyEngine,
        repositories::snapshot_repository::SnapshotRepository,
    },
    entities::{
        BedId, MonthKey, MutationOutcome, RentEditMode, RoomId, Snapshot, TenantData, TenantId,
        TenantUpdate,
    },
};

/// Load the current snapshot, apply one occupancy operation, and persist the
/// result unless nothing changed.
#[async_trait]
pub trait OccupancyUsecase: Send + Sync {
    async fn book_bed(
        &self,
        room_id: &RoomId,
        bed_id: &BedId,
        data: TenantData,
    ) -> Result<MutationOutcome, ServerError>;

    async fn book_room(
        &self,
        room_id: &RoomId,
        data: TenantData,
    ) -> Result<MutationOutcome, ServerError>;

    async fn vacate_bed(
        &self,
        room_id: &RoomId,
        bed_id: &BedId,
        vacate_date: Option<NaiveDate>,
    ) -> Result<MutationOutcome, ServerError>;

    async fn vacate_room(
        &self,
        room_id: &RoomId,
        vacate_date: Option<NaiveDate>,
    ) -> Result<MutationOutcome, ServerError>;

    async fn clear_bed(&self, room_id: &RoomId, bed_id: &BedId)
        -> Result<MutationOutcome, ServerError>;

    async fn clear_room(&self, room_id: &RoomId) -> Result<MutationOutcome, ServerError>;

    async fn update_tenant(
        &self,
        tenant_id: &TenantId,
        update: TenantUpdate,
    ) -> Result<MutationOutcome, ServerError>;

    async fn edit_rent(
        &self,
        tenant_id: &TenantId,
        amount: f64,
        mode: RentEditMode,
    ) -> Result<MutationOutcome, ServerError>;

    async fn toggle_rent_paid(
        &self,
        tenant_id: &TenantId,
        month: MonthKey,
    ) -> Result<MutationOutcome, ServerError>;

    async fn set_rent_paid(
        &self,
        tenant_id: &TenantId,
        month: MonthKey,
        paid: bool,
    ) -> Result<MutationOutcome, ServerError>;

    async fn set_default_rent(
        &self,
        room_id: &RoomId,
        bed_id: &BedId,
        default_rent: Option<f64>,
    ) -> Result<MutationOutcome, ServerError>;
}

pub(crate) struct OccupancyUsecaseImpl<R: SnapshotRepository> {
    repository: Arc<R>,
    engine: OccupancyEngine,
}

impl<R: SnapshotRepository> OccupancyUsecaseImpl<R> {
    pub(crate) fn new(repository: Arc<R>, engine: OccupancyEngine) -> Self {
        Self { repository, engine }
    }

    async fn apply<F>(&self, op: &'static str, f: F) -> Result<MutationOutcome, ServerError>
    where
        F: FnOnce(&OccupancyEngine, &Snapshot) -> Snapshot + Send,
    {
        let before = self.repository.load().await?;
        let after = f(&self.engine, &before);
        if after.unchanged_from(&before) {
            debug!(op, "nothing changed; skipping save");
            return Ok(MutationOutcome {
                snapshot: before,
                changed: false,
            });
        }
        self.repository.save(&after).await?;
        Ok(MutationOutcome {
            snapshot: after,
            changed: true,
        })
    }
}

#[async_trait]
impl<R: SnapshotRepository> OccupancyUsecase for OccupancyUsecaseImpl<R> {
    async fn book_bed(
        &self,
        room_id: &RoomId,
        bed_id: &BedId,
        data: TenantData,
    ) -> Result<MutationOutcome, ServerError> {
        self.apply("book_bed", |e, s| e.book_bed(s, room_id, bed_id, data))
            .await
    }

    async fn book_room(
        &self,
        room_id: &RoomId,
        data: TenantData,
    ) -> Result<MutationOutcome, ServerError> {
        self.apply("book_room", |e, s| e.book_room(s, room_id, data))
            .await
    }

    async fn vacate_bed(
        &self,
        room_id: &RoomId,
        bed_id: &BedId,
        vacate_date: Option<NaiveDate>,
    ) -> Result<MutationOutcome, ServerError> {
        self.apply("vacate_bed", |e, s| {
            e.vacate_bed(s, room_id, bed_id, vacate_date)
        })
        .await
    }

    async fn vacate_room(
        &self,
        room_id: &RoomId,
        vacate_date: Option<NaiveDate>,
    ) -> Result<MutationOutcome, ServerError> {
        self.apply("vacate_room", |e, s| e.vacate_room(s, room_id, vacate_date))
            .await
    }

    async fn clear_bed(
        &self,
        room_id: &RoomId,
        bed_id: &BedId,
    ) -> Result<MutationOutcome, ServerError> {
        self.apply("clear_bed", |e, s| e.clear_bed(s, room_id, bed_id))
            .await
    }

    async fn clear_room(&self, room_id: &RoomId) -> Result<MutationOutcome, ServerError> {
        self.apply("clear_room", |e, s| e.clear_room(s, room_id))
            .await
    }

    async fn update_tenant(
        &self,
        tenant_id: &TenantId,
        update: TenantUpdate,
    ) -> Result<MutationOutcome, ServerError> {
        self.apply("update_tenant", |_, s| Snapshot {
            rooms: Arc::clone(&s.rooms),
            tenants: OccupancyEngine::update_tenant(&s.tenants, tenant_id, update),
        })
        .await
    }

    async fn edit_rent(
        &self,
        tenant_id: &TenantId,
        amount: f64,
        mode: RentEditMode,
    ) -> Result<MutationOutcome, ServerError> {
        self.apply("edit_rent", |e, s| Snapshot {
            rooms: Arc::clone(&s.rooms),
            tenants: e.edit_rent(&s.tenants, tenant_id, amount, mode),
        })
        .await
    }

    async fn toggle_rent_paid(
        &self,
        tenant_id: &TenantId,
        month: MonthKey,
    ) -> Result<MutationOutcome, ServerError> {
        self.apply("toggle_rent_paid", |_, s| Snapshot {
            rooms: Arc::clone(&s.rooms),
            tenants: OccupancyEngine::toggle_rent_paid(&s.tenants, tenant_id, month),
        })
        .await
    }

    async fn set_rent_paid(
        &self,
        tenant_id: &TenantId,
        month: MonthKey,
        paid: bool,
    ) -> Result<MutationOutcome, ServerError> {
        self.apply("set_rent_paid", |_, s| Snapshot {
            rooms: Arc::clone(&s.rooms),
            tenants: OccupancyEngine::set_rent_paid(&s.tenants, tenant_id, month, paid),
        })
        .await
    }

    async fn set_default_rent(
        &self,
        room_id: &RoomId,
        bed_id: &BedId,
        default_rent: Option<f64>,
    ) -> Result<MutationOutcome, ServerError> {
        self.apply("set_default_rent", |_, s| Snapshot {
            rooms: OccupancyEngine::set_default_rent(&s.rooms, room_id, bed_id, default_rent),
            tenants: Arc::clone(&s.tenants),
        })
        .await
    }
}
