use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;

use super::{
    month_key::MonthKey,
    room::{BedId, RoomId},
};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct TenantId(pub(crate) String);

/// How the tenant holds their space.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Tenancy {
    PerBed { bed_id: BedId },
    /// Every bed of the room is leased to this tenant as one unit.
    WholeRoom,
}

/// A point in time from which a new rent amount takes effect.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct RentChange {
    pub from: MonthKey,
    pub amount: f64,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub contact: String,
    pub notes: String,
    /// Original baseline rent. Only used as a fallback when no rent change
    /// applies to a month.
    pub rent: f64,
    pub deposit: f64,
    pub deposit_paid: bool,
    pub caution_deposit: f64,
    pub caution_deposit_paid: bool,
    pub joining_date: Option<NaiveDate>,
    pub vacate_date: Option<NaiveDate>,
    pub active: bool,
    pub room_id: RoomId,
    pub tenancy: Tenancy,
    /// Paid status per month. Keys only exist for months that have been
    /// explicitly toggled; months after the current one are pre-payments.
    pub rent_history: BTreeMap<MonthKey, bool>,
    /// Sorted by `from`, at most one entry per month.
    pub rent_changes: Vec<RentChange>,
}

/// Input for a new booking.
#[derive(Debug, Clone, Default)]
pub struct TenantData {
    pub name: String,
    pub contact: String,
    pub notes: String,
    pub rent: f64,
    pub deposit: f64,
    pub deposit_paid: bool,
    pub caution_deposit: f64,
    pub caution_deposit_paid: bool,
    pub joining_date: Option<NaiveDate>,
}

/// Shallow patch merged into a tenant by `update_tenant`. Fields left as
/// None are untouched.
///
/// Rent amounts are deliberately absent: they change only through
/// `RentLedger::edit_rent`.
#[derive(Debug, Clone, Default)]
pub struct TenantUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub notes: Option<String>,
    pub deposit: Option<f64>,
    pub deposit_paid: Option<bool>,
    pub caution_deposit: Option<f64>,
    pub caution_deposit_paid: Option<bool>,
    pub joining_date: Option<NaiveDate>,
    pub vacate_date: Option<Option<NaiveDate>>,
    pub active: Option<bool>,
    pub rent_history: Option<BTreeMap<MonthKey, bool>>,
}

// --

impl TenantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn tenant_id(id: impl Into<String>) -> TenantId {
    TenantId(id.into())
}

impl Tenancy {
    pub fn bed_id(&self) -> Option<&BedId> {
        match self {
            Tenancy::PerBed { bed_id } => Some(bed_id),
            Tenancy::WholeRoom => None,
        }
    }

    pub fn is_whole_room(&self) -> bool {
        matches!(self, Tenancy::WholeRoom)
    }

    /// "Entire Room" or "Bed {n}".
    pub fn label(&self) -> String {
        match self {
            Tenancy::PerBed { bed_id } => format!("Bed {}", bed_id.number()),
            Tenancy::WholeRoom => "Entire Room".to_string(),
        }
    }
}

impl Tenant {
    pub fn joining_month(&self) -> Option<MonthKey> {
        self.joining_date.map(MonthKey::of)
    }

    pub fn vacate_month(&self) -> Option<MonthKey> {
        self.vacate_date.map(MonthKey::of)
    }

    pub fn is_paid(&self, month: &MonthKey) -> bool {
        self.rent_history.get(month).copied().unwrap_or(false)
    }

    /// "Room 101 · Bed 2" or "Room 101".
    pub fn location_label(&self) -> String {
        match &self.tenancy {
            Tenancy::PerBed { bed_id } => {
                format!("Room {} · Bed {}", self.room_id, bed_id.number())
            }
            Tenancy::WholeRoom => format!("Room {}", self.room_id),
        }
    }
}

impl TenantUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact.is_none()
            && self.notes.is_none()
            && self.deposit.is_none()
            && self.deposit_paid.is_none()
            && self.caution_deposit.is_none()
            && self.caution_deposit_paid.is_none()
            && self.joining_date.is_none()
            && self.vacate_date.is_none()
            && self.active.is_none()
            && self.rent_history.is_none()
    }

    pub(crate) fn apply_to(self, tenant: &Tenant) -> Tenant {
        let mut t = tenant.clone();
        if let Some(v) = self.name {
            t.name = v;
        }
        if let Some(v) = self.contact {
            t.contact = v;
        }
        if let Some(v) = self.notes {
            t.notes = v;
        }
        if let Some(v) = self.deposit {
            t.deposit = v;
        }
        if let Some(v) = self.deposit_paid {
            t.deposit_paid = v;
        }
        if let Some(v) = self.caution_deposit {
            t.caution_deposit = v;
        }
        if let Some(v) = self.caution_deposit_paid {
            t.caution_deposit_paid = v;
        }
        if let Some(v) = self.joining_date {
            t.joining_date = Some(v);
        }
        if let Some(v) = self.vacate_date {
            t.vacate_date = v;
        }
        if let Some(v) = self.active {
            t.active = v;
        }
        if let Some(v) = self.rent_history {
            t.rent_history = v;
        }
        t
    }
}
