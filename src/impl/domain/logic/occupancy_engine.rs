use std::{collections::BTreeMap, sync::Arc};

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::{
    domain::logic::rent_ledger::RentLedger,
    entities::{
        BedId, Clock, IdGenerator, MonthKey, RentChange, RentEditMode, Room, RoomId, Rooms,
        Snapshot, Tenancy, Tenant, TenantData, TenantId, TenantUpdate, Tenants,
    },
};

/// Bed/room state machine (`VACANT <-> OCCUPIED`).
///
/// Every operation takes the current collections and returns new ones,
/// reusing unchanged rooms and tenants by reference. An operation that
/// finds nothing to do returns its input collections themselves, so
/// `Snapshot::unchanged_from` detects the no-op.
pub struct OccupancyEngine {
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl OccupancyEngine {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }

    pub fn book_bed(
        &self,
        snapshot: &Snapshot,
        room_id: &RoomId,
        bed_id: &BedId,
        data: TenantData,
    ) -> Snapshot {
        let Some(bed) = snapshot.room(room_id).and_then(|r| r.bed(bed_id)) else {
            warn!(%room_id, %bed_id, "book_bed: unknown bed");
            return snapshot.clone();
        };
        if bed.is_occupied() {
            warn!(%room_id, %bed_id, "book_bed: bed already occupied");
            return snapshot.clone();
        }

        let tenant = self.new_tenant(
            data,
            room_id.clone(),
            Tenancy::PerBed {
                bed_id: bed_id.clone(),
            },
        );
        let tenant_id = tenant.id.clone();
        let rooms = map_room(&snapshot.rooms, room_id, |room| Room {
            beds: room
                .beds
                .iter()
                .map(|b| {
                    if &b.id == bed_id {
                        let mut b = b.clone();
                        b.occupant = Some(tenant_id.clone());
                        b
                    } else {
                        b.clone()
                    }
                })
                .collect(),
            ..room.clone()
        });
        info!(%room_id, %bed_id, tenant = %tenant_id, "bed booked");
        Snapshot {
            rooms,
            tenants: push_tenant(&snapshot.tenants, tenant),
        }
    }

    /// Leases every bed of a `bookable_as_room` room, none of which may be
    /// occupied, to one new tenant.
    pub fn book_room(&self, snapshot: &Snapshot, room_id: &RoomId, data: TenantData) -> Snapshot {
        let Some(room) = snapshot.room(room_id) else {
            warn!(%room_id, "book_room: unknown room");
            return snapshot.clone();
        };
        if !room.bookable_as_room {
            warn!(%room_id, "book_room: room is not bookable as a whole");
            return snapshot.clone();
        }
        if room.occupied_beds() > 0 || room.beds.is_empty() {
            warn!(%room_id, "book_room: room is not entirely vacant");
            return snapshot.clone();
        }

        let tenant = self.new_tenant(data, room_id.clone(), Tenancy::WholeRoom);
        let tenant_id = tenant.id.clone();
        let rooms = map_room(&snapshot.rooms, room_id, |room| Room {
            beds: room
                .beds
                .iter()
                .map(|b| {
                    let mut b = b.clone();
                    b.occupant = Some(tenant_id.clone());
                    b
                })
                .collect(),
            ..room.clone()
        });
        info!(%room_id, tenant = %tenant_id, "room booked");
        Snapshot {
            rooms,
            tenants: push_tenant(&snapshot.tenants, tenant),
        }
    }

    /// Frees the bed and deactivates its tenant, stamping `vacate_date`
    /// (today if not given). A whole-room tenant is vacated from the entire
    /// room.
    pub fn vacate_bed(
        &self,
        snapshot: &Snapshot,
        room_id: &RoomId,
        bed_id: &BedId,
        vacate_date: Option<NaiveDate>,
    ) -> Snapshot {
        match self.bed_release(snapshot, room_id, bed_id) {
            Release::Nothing => snapshot.clone(),
            Release::WholeRoom => self.vacate_room(snapshot, room_id, vacate_date),
            Release::Bed(tenant_id) => {
                let vacate_date = vacate_date.unwrap_or_else(|| self.clock.today());
                info!(%room_id, %bed_id, tenant = %tenant_id, %vacate_date, "bed vacated");
                Snapshot {
                    rooms: free_beds(&snapshot.rooms, room_id, Some(bed_id)),
                    tenants: deactivate(&snapshot.tenants, &[tenant_id], vacate_date),
                }
            }
        }
    }

    pub fn vacate_room(
        &self,
        snapshot: &Snapshot,
        room_id: &RoomId,
        vacate_date: Option<NaiveDate>,
    ) -> Snapshot {
        let occupants = room_occupants(snapshot, room_id);
        if occupants.is_empty() {
            return snapshot.clone();
        }
        let vacate_date = vacate_date.unwrap_or_else(|| self.clock.today());
        info!(%room_id, tenants = ?occupants, %vacate_date, "room vacated");
        Snapshot {
            rooms: free_beds(&snapshot.rooms, room_id, None),
            tenants: deactivate(&snapshot.tenants, &occupants, vacate_date),
        }
    }

    /// Like `vacate_bed`, but deletes the tenant record outright. Used to
    /// undo an erroneous booking.
    pub fn clear_bed(&self, snapshot: &Snapshot, room_id: &RoomId, bed_id: &BedId) -> Snapshot {
        match self.bed_release(snapshot, room_id, bed_id) {
            Release::Nothing => snapshot.clone(),
            Release::WholeRoom => self.clear_room(snapshot, room_id),
            Release::Bed(tenant_id) => {
                info!(%room_id, %bed_id, tenant = %tenant_id, "bed cleared");
                Snapshot {
                    rooms: free_beds(&snapshot.rooms, room_id, Some(bed_id)),
                    tenants: remove(&snapshot.tenants, &[tenant_id]),
                }
            }
        }
    }

    pub fn clear_room(&self, snapshot: &Snapshot, room_id: &RoomId) -> Snapshot {
        let occupants = room_occupants(snapshot, room_id);
        if occupants.is_empty() {
            return snapshot.clone();
        }
        info!(%room_id, tenants = ?occupants, "room cleared");
        Snapshot {
            rooms: free_beds(&snapshot.rooms, room_id, None),
            tenants: remove(&snapshot.tenants, &occupants),
        }
    }

    /// Shallow-merges `update` into the matching tenant. Unknown ids are a
    /// no-op.
    pub fn update_tenant(tenants: &Tenants, tenant_id: &TenantId, update: TenantUpdate) -> Tenants {
        if update.is_empty() {
            return Arc::clone(tenants);
        }
        map_tenant(tenants, tenant_id, |t| Arc::new(update.apply_to(t)))
    }

    /// Changes the tenant's rent as of the current month.
    pub fn edit_rent(
        &self,
        tenants: &Tenants,
        tenant_id: &TenantId,
        amount: f64,
        mode: RentEditMode,
    ) -> Tenants {
        let current = MonthKey::of(self.clock.today());
        map_tenant(tenants, tenant_id, |t| {
            RentLedger::edit_rent(t, amount, mode, current)
        })
    }

    pub fn toggle_rent_paid(tenants: &Tenants, tenant_id: &TenantId, month: MonthKey) -> Tenants {
        map_tenant(tenants, tenant_id, |t| RentLedger::toggle_paid(t, month))
    }

    pub fn set_rent_paid(
        tenants: &Tenants,
        tenant_id: &TenantId,
        month: MonthKey,
        paid: bool,
    ) -> Tenants {
        map_tenant(tenants, tenant_id, |t| RentLedger::set_paid(t, month, paid))
    }

    /// Updates the pre-fill hint of one bed. Does not touch any tenancy.
    pub fn set_default_rent(
        rooms: &Rooms,
        room_id: &RoomId,
        bed_id: &BedId,
        default_rent: Option<f64>,
    ) -> Rooms {
        let Some(room) = rooms.iter().find(|r| &r.id == room_id) else {
            return Arc::clone(rooms);
        };
        match room.bed(bed_id) {
            Some(bed) if bed.default_rent != default_rent => {}
            _ => return Arc::clone(rooms),
        }
        map_room(rooms, room_id, |room| Room {
            beds: room
                .beds
                .iter()
                .map(|b| {
                    let mut b = b.clone();
                    if &b.id == bed_id {
                        b.default_rent = default_rent;
                    }
                    b
                })
                .collect(),
            ..room.clone()
        })
    }

    /// Rent to pre-fill in a booking form: the bed's default rent, or for a
    /// whole-room booking the sum of every bed's default rent (None unless
    /// all beds carry one).
    pub fn prefill_rent(room: &Room, bed_id: Option<&BedId>) -> Option<f64> {
        match bed_id {
            Some(bed_id) => room.bed(bed_id).and_then(|b| b.default_rent),
            None => room
                .beds
                .iter()
                .map(|b| b.default_rent)
                .sum::<Option<f64>>()
                .filter(|_| !room.beds.is_empty()),
        }
    }

    fn new_tenant(&self, data: TenantData, room_id: RoomId, tenancy: Tenancy) -> Tenant {
        let joining_date = data.joining_date.unwrap_or_else(|| self.clock.today());
        Tenant {
            id: self.ids.next_id(),
            name: data.name,
            contact: data.contact,
            notes: data.notes,
            rent: data.rent,
            deposit: data.deposit,
            deposit_paid: data.deposit_paid,
            caution_deposit: data.caution_deposit,
            caution_deposit_paid: data.caution_deposit_paid,
            joining_date: Some(joining_date),
            vacate_date: None,
            active: true,
            room_id,
            tenancy,
            rent_history: BTreeMap::new(),
            rent_changes: vec![RentChange {
                from: MonthKey::of(joining_date),
                amount: data.rent,
            }],
        }
    }

    fn bed_release(&self, snapshot: &Snapshot, room_id: &RoomId, bed_id: &BedId) -> Release {
        let Some(tenant_id) = snapshot
            .room(room_id)
            .and_then(|r| r.bed(bed_id))
            .and_then(|b| b.occupant.clone())
        else {
            return Release::Nothing;
        };
        // A whole-room tenant releases the room only if nobody else shares it.
        let sole_occupant =
            matches!(room_occupants(snapshot, room_id).as_slice(), [only] if *only == tenant_id);
        match snapshot.tenant(&tenant_id) {
            Some(t) if t.tenancy.is_whole_room() && sole_occupant => Release::WholeRoom,
            _ => Release::Bed(tenant_id),
        }
    }
}

enum Release {
    Nothing,
    Bed(TenantId),
    WholeRoom,
}

fn room_occupants(snapshot: &Snapshot, room_id: &RoomId) -> Vec<TenantId> {
    let mut occupants: Vec<TenantId> = Vec::new();
    if let Some(room) = snapshot.room(room_id) {
        for id in room.beds.iter().filter_map(|b| b.occupant.as_ref()) {
            if !occupants.contains(id) {
                occupants.push(id.clone());
            }
        }
    }
    occupants
}

fn map_room(rooms: &Rooms, room_id: &RoomId, f: impl FnOnce(&Room) -> Room) -> Rooms {
    let Some(index) = rooms.iter().position(|r| &r.id == room_id) else {
        return Arc::clone(rooms);
    };
    let mut v: Vec<Arc<Room>> = rooms.iter().cloned().collect();
    v[index] = Arc::new(f(&rooms[index]));
    Arc::new(v)
}

fn map_tenant(
    tenants: &Tenants,
    tenant_id: &TenantId,
    f: impl FnOnce(&Arc<Tenant>) -> Arc<Tenant>,
) -> Tenants {
    let Some(index) = tenants.iter().position(|t| &t.id == tenant_id) else {
        return Arc::clone(tenants);
    };
    let updated = f(&tenants[index]);
    if Arc::ptr_eq(&updated, &tenants[index]) {
        return Arc::clone(tenants);
    }
    let mut v: Vec<Arc<Tenant>> = tenants.iter().cloned().collect();
    v[index] = updated;
    Arc::new(v)
}

fn push_tenant(tenants: &Tenants, tenant: Tenant) -> Tenants {
    let mut v: Vec<Arc<Tenant>> = tenants.iter().cloned().collect();
    v.push(Arc::new(tenant));
    Arc::new(v)
}

/// Frees one bed, or every bed when `bed_id` is None.
fn free_beds(rooms: &Rooms, room_id: &RoomId, bed_id: Option<&BedId>) -> Rooms {
    map_room(rooms, room_id, |room| Room {
        beds: room
            .beds
            .iter()
            .map(|b| {
                let mut b = b.clone();
                if bed_id.map_or(true, |id| &b.id == id) {
                    b.occupant = None;
                }
                b
            })
            .collect(),
        ..room.clone()
    })
}

fn deactivate(tenants: &Tenants, ids: &[TenantId], vacate_date: NaiveDate) -> Tenants {
    Arc::new(
        tenants
            .iter()
            .map(|t| {
                if ids.contains(&t.id) {
                    Arc::new(Tenant {
                        active: false,
                        vacate_date: Some(vacate_date),
                        ..(**t).clone()
                    })
                } else {
                    Arc::clone(t)
                }
            })
            .collect(),
    )
}

fn remove(tenants: &Tenants, ids: &[TenantId]) -> Tenants {
    Arc::new(
        tenants
            .iter()
            .filter(|t| !ids.contains(&t.id))
            .cloned()
            .collect(),
    )
}
