use std::sync::Arc;

use super::{
    room::{BedId, Room, RoomId},
    tenant::{Tenant, TenantId},
};

/// Copy-on-write room collection. Unmodified rooms are shared by reference
/// between successive snapshots.
pub type Rooms = Arc<Vec<Arc<Room>>>;

/// Copy-on-write tenant collection.
pub type Tenants = Arc<Vec<Arc<Tenant>>>;

/// The whole persisted document: every room and every tenant, including
/// vacated tenants kept for history.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub rooms: Rooms,
    pub tenants: Tenants,
}

impl Snapshot {
    pub fn new(rooms: Vec<Room>, tenants: Vec<Tenant>) -> Self {
        Self {
            rooms: Arc::new(rooms.into_iter().map(Arc::new).collect()),
            tenants: Arc::new(tenants.into_iter().map(Arc::new).collect()),
        }
    }

    /// True when both collections are the very same allocations as in
    /// `other`, i.e. an operation returned its input untouched.
    pub fn unchanged_from(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.rooms, &other.rooms) && Arc::ptr_eq(&self.tenants, &other.tenants)
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Arc<Room>> {
        self.rooms.iter().find(|r| &r.id == room_id)
    }

    pub fn tenant(&self, tenant_id: &TenantId) -> Option<&Arc<Tenant>> {
        self.tenants.iter().find(|t| &t.id == tenant_id)
    }

    /// Tenant currently holding the given bed, if any.
    pub fn occupant_of(&self, room_id: &RoomId, bed_id: &BedId) -> Option<&Arc<Tenant>> {
        self.room(room_id)
            .and_then(|r| r.bed(bed_id))
            .and_then(|b| b.occupant.as_ref())
            .and_then(|id| self.tenant(id))
    }

    pub fn active_tenants(&self) -> impl Iterator<Item = &Arc<Tenant>> {
        self.tenants.iter().filter(|t| t.active)
    }
}

/// Result of a persisted mutation. `changed` is false when the operation
/// found nothing to do (unknown target, guard not met), in which case
/// nothing was written.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    pub snapshot: Snapshot,
    pub changed: bool,
}
