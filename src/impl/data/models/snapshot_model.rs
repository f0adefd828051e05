use std::collections::BTreeMap;

use tracing::warn;

use crate::entities::{
    Bed, BedId, MonthKey, RentChange, Room, RoomId, Snapshot, Tenancy, Tenant, TenantId,
};

use super::{
    amount_model::{deserialize_amount, deserialize_optional_amount},
    iso_date_model::ISODateModel,
};

// Wire shape of the persisted document. Field names and nullability follow
// the stored JSON exactly; the conversions below map it to and from the
// domain entities.

#[derive(Debug, Default, serde_derive::Serialize, serde_derive::Deserialize)]
pub(crate) struct SnapshotModel {
    #[serde(default)]
    pub rooms: Vec<RoomModel>,
    #[serde(default)]
    pub tenants: Vec<TenantModel>,
}

#[derive(Debug, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoomModel {
    pub id: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub total_beds: usize,
    #[serde(default)]
    pub bookable_as_room: bool,
    #[serde(default)]
    pub beds: Vec<BedModel>,
}

#[derive(Debug, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BedModel {
    pub id: String,
    #[serde(default)]
    pub occupied: bool,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub default_rent: Option<f64>,
}

#[derive(Debug, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TenantModel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub rent: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub deposit: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub caution_deposit: f64,
    #[serde(default)]
    pub deposit_paid: bool,
    #[serde(default)]
    pub caution_deposit_paid: bool,
    #[serde(default)]
    pub joining_date: Option<String>,
    #[serde(default)]
    pub vacate_date: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub bed_id: Option<String>,
    #[serde(default)]
    pub room_booked: bool,
    #[serde(default)]
    pub rent_history: BTreeMap<String, bool>,
    #[serde(default)]
    pub rent_changes: Vec<RentChangeModel>,
}

#[derive(Debug, serde_derive::Serialize, serde_derive::Deserialize)]
pub(crate) struct RentChangeModel {
    pub from: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
}

fn default_active() -> bool {
    true
}

// Model -> entity.
// ---

impl Into<Snapshot> for SnapshotModel {
    fn into(self) -> Snapshot {
        let rooms: Vec<Room> = self.rooms.into_iter().map(Into::into).collect();
        let placements = Placements::of(&rooms);
        let tenants = self
            .tenants
            .into_iter()
            .map(|t| t.into_tenant(&placements))
            .collect();
        Snapshot::new(rooms, tenants)
    }
}

/// Beds referencing each tenant, used to recover the tenancy of records
/// stored without `bedId`/`roomBooked`.
struct Placements<'a> {
    rooms: &'a [Room],
    beds: BTreeMap<&'a str, Vec<(&'a RoomId, &'a BedId)>>,
}

impl<'a> Placements<'a> {
    fn of(rooms: &'a [Room]) -> Self {
        let mut beds: BTreeMap<&str, Vec<(&RoomId, &BedId)>> = BTreeMap::new();
        for room in rooms {
            for bed in &room.beds {
                if let Some(occupant) = &bed.occupant {
                    beds.entry(occupant.as_str())
                        .or_default()
                        .push((&room.id, &bed.id));
                }
            }
        }
        Self { rooms, beds }
    }

    fn beds_of(&self, tenant_id: &str) -> &[(&'a RoomId, &'a BedId)] {
        self.beds.get(tenant_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tenancy and room implied by the beds holding the tenant. None if no
    /// bed references them.
    fn infer(&self, tenant_id: &str) -> Option<(Tenancy, RoomId)> {
        let beds = self.beds_of(tenant_id);
        let (room_id, first_bed) = *beds.first()?;
        let single_room = beds.iter().all(|(r, _)| *r == room_id);
        let room_total = self
            .rooms
            .iter()
            .find(|r| &r.id == room_id)
            .map_or(0, Room::total_beds);
        if beds.len() > 1 && single_room && beds.len() == room_total {
            return Some((Tenancy::WholeRoom, room_id.clone()));
        }
        if beds.len() > 1 {
            warn!(tenant = tenant_id, beds = beds.len(), "tenant holds several beds without a room booking; keeping the first");
        }
        Some((
            Tenancy::PerBed {
                bed_id: first_bed.clone(),
            },
            room_id.clone(),
        ))
    }

    fn room_of_bed(&self, bed_id: &str) -> Option<RoomId> {
        self.rooms
            .iter()
            .find(|r| r.beds.iter().any(|b| b.id.as_str() == bed_id))
            .map(|r| r.id.clone())
    }
}

impl Into<Room> for RoomModel {
    fn into(self) -> Room {
        let id = RoomId(self.id);
        let mut beds: Vec<Bed> = self
            .beds
            .into_iter()
            .map(|b| {
                let occupant = b.tenant_id.filter(|t| !t.is_empty()).map(TenantId);
                if b.occupied && occupant.is_none() {
                    warn!(bed = %b.id, "bed marked occupied without a tenant; loading as vacant");
                }
                Bed {
                    id: BedId(b.id),
                    occupant,
                    default_rent: b.default_rent,
                }
            })
            .collect();
        if beds.len() < self.total_beds {
            warn!(room = %id, stored = beds.len(), total = self.total_beds, "padding missing beds");
            for i in beds.len() + 1..=self.total_beds {
                beds.push(Bed::vacant(BedId::new(&id, i)));
            }
        } else if beds.len() > self.total_beds {
            warn!(room = %id, stored = beds.len(), total = self.total_beds, "room lists more beds than its total");
        }
        Room {
            id,
            floor: self.floor,
            bookable_as_room: self.bookable_as_room,
            beds,
        }
    }
}

impl TenantModel {
    fn into_tenant(self, placements: &Placements) -> Tenant {
        let stored_room = self.room_id.filter(|r| !r.is_empty()).map(RoomId);
        let stored_bed = self.bed_id.filter(|b| !b.is_empty());
        let (tenancy, room_id) = match (self.room_booked, stored_bed) {
            (true, _) => {
                let room_id = stored_room.or_else(|| {
                    placements
                        .beds_of(&self.id)
                        .first()
                        .map(|(r, _)| (*r).clone())
                });
                (Tenancy::WholeRoom, room_id)
            }
            (false, Some(bed_id)) => {
                let room_id = stored_room.or_else(|| placements.room_of_bed(&bed_id));
                (
                    Tenancy::PerBed {
                        bed_id: BedId(bed_id),
                    },
                    room_id,
                )
            }
            (false, None) => match placements.infer(&self.id) {
                Some((tenancy, room_id)) => (tenancy, stored_room.or(Some(room_id))),
                None => {
                    warn!(tenant = %self.id, "tenant has neither a bed nor a room booking; treating as whole-room");
                    (Tenancy::WholeRoom, stored_room)
                }
            },
        };

        let rent_history = self
            .rent_history
            .into_iter()
            .filter_map(|(k, paid)| match k.parse::<MonthKey>() {
                Ok(month) => Some((month, paid)),
                Err(e) => {
                    warn!(tenant = %self.id, error = %e, "dropping rent history entry");
                    None
                }
            })
            .collect();

        // Later duplicates win; the map also leaves the entries sorted.
        let rent_changes: BTreeMap<MonthKey, f64> = self
            .rent_changes
            .into_iter()
            .filter_map(|c| match c.from.parse::<MonthKey>() {
                Ok(from) => Some((from, c.amount)),
                Err(e) => {
                    warn!(tenant = %self.id, error = %e, "dropping rent change");
                    None
                }
            })
            .collect();

        Tenant {
            joining_date: ISODateModel::parse_optional(self.joining_date.as_deref()),
            vacate_date: ISODateModel::parse_optional(self.vacate_date.as_deref()),
            id: TenantId(self.id),
            name: self.name,
            contact: self.contact,
            notes: self.notes,
            rent: self.rent,
            deposit: self.deposit,
            deposit_paid: self.deposit_paid,
            caution_deposit: self.caution_deposit,
            caution_deposit_paid: self.caution_deposit_paid,
            active: self.active,
            room_id: room_id.unwrap_or_else(|| RoomId(String::new())),
            tenancy,
            rent_history,
            rent_changes: rent_changes
                .into_iter()
                .map(|(from, amount)| RentChange { from, amount })
                .collect(),
        }
    }
}

// Entity -> model.
// ---

impl From<&Snapshot> for SnapshotModel {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            rooms: snapshot.rooms.iter().map(|r| RoomModel::from(&**r)).collect(),
            tenants: snapshot.tenants.iter().map(|t| TenantModel::from(&**t)).collect(),
        }
    }
}

impl From<&Room> for RoomModel {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.0.clone(),
            floor: room.floor.clone(),
            total_beds: room.total_beds(),
            bookable_as_room: room.bookable_as_room,
            beds: room
                .beds
                .iter()
                .map(|b| BedModel {
                    id: b.id.0.clone(),
                    occupied: b.is_occupied(),
                    tenant_id: b.occupant.as_ref().map(|t| t.0.clone()),
                    default_rent: b.default_rent,
                })
                .collect(),
        }
    }
}

impl From<&Tenant> for TenantModel {
    fn from(t: &Tenant) -> Self {
        Self {
            id: t.id.0.clone(),
            name: t.name.clone(),
            contact: t.contact.clone(),
            notes: t.notes.clone(),
            rent: t.rent,
            deposit: t.deposit,
            caution_deposit: t.caution_deposit,
            deposit_paid: t.deposit_paid,
            caution_deposit_paid: t.caution_deposit_paid,
            joining_date: t.joining_date.map(ISODateModel::format),
            vacate_date: t.vacate_date.map(ISODateModel::format),
            active: t.active,
            room_id: Some(t.room_id.0.clone()),
            bed_id: t.tenancy.bed_id().map(|b| b.0.clone()),
            room_booked: t.tenancy.is_whole_room(),
            rent_history: t
                .rent_history
                .iter()
                .map(|(m, paid)| (m.to_string(), *paid))
                .collect(),
            rent_changes: t
                .rent_changes
                .iter()
                .map(|c| RentChangeModel {
                    from: c.from.to_string(),
                    amount: c.amount,
                })
                .collect(),
        }
    }
}
