use std::fmt;

use super::tenant::TenantId;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct RoomId(pub(crate) String);

/// Derived as `{roomId}-{index}`, 1-based.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct BedId(pub(crate) String);

#[derive(Debug, PartialEq, Clone)]
pub struct Bed {
    pub id: BedId,
    /// Tenant currently holding the bed. A bed is occupied exactly when this
    /// is set.
    pub occupant: Option<TenantId>,
    /// Pre-fill hint for new bookings, independent of any live tenancy.
    pub default_rent: Option<f64>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Room {
    pub id: RoomId,
    pub floor: String,
    /// Whether the whole room may be leased to a single tenant.
    pub bookable_as_room: bool,
    pub beds: Vec<Bed>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RoomStatus {
    Empty,
    Partial,
    Full,
}

// --

impl RoomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl BedId {
    pub fn new(room_id: &RoomId, index: usize) -> Self {
        BedId(format!("{}-{}", room_id.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bed number within its room (the suffix after the last '-').
    pub fn number(&self) -> &str {
        self.0.rsplit('-').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for BedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Bed {
    pub fn vacant(id: BedId) -> Self {
        Self {
            id,
            occupant: None,
            default_rent: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

impl Room {
    pub fn total_beds(&self) -> usize {
        self.beds.len()
    }

    pub fn occupied_beds(&self) -> usize {
        self.beds.iter().filter(|b| b.is_occupied()).count()
    }

    pub fn bed(&self, bed_id: &BedId) -> Option<&Bed> {
        self.beds.iter().find(|b| &b.id == bed_id)
    }

    pub fn status(&self) -> RoomStatus {
        match self.occupied_beds() {
            0 => RoomStatus::Empty,
            n if n == self.total_beds() => RoomStatus::Full,
            _ => RoomStatus::Partial,
        }
    }
}

// Shorthand constructors.

pub fn room_id(id: impl Into<String>) -> RoomId {
    RoomId(id.into())
}

pub fn bed_id(id: impl Into<String>) -> BedId {
    BedId(id.into())
}
