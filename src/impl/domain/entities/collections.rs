use super::{month_key::MonthKey, tenant::TenantId};

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct MonthStats {
    pub expected: f64,
    pub collected: f64,
    pub paid_count: usize,
    pub total: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MonthSummary {
    pub month: MonthKey,
    pub is_current: bool,
    pub stats: MonthStats,
}

#[derive(Debug, PartialEq, Clone)]
pub struct CollectionRow {
    pub tenant_id: TenantId,
    pub name: String,
    pub location: String,
    pub rent: f64,
    pub paid: bool,
}

/// Collections view for a single month: paid rows first, then unpaid.
#[derive(Debug, PartialEq, Clone)]
pub struct CollectionSheet {
    pub month: MonthKey,
    pub rows: Vec<CollectionRow>,
    pub stats: MonthStats,
}

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct OccupancySummary {
    pub total_beds: usize,
    pub occupied_beds: usize,
    pub vacant_beds: usize,
    pub full_rooms: usize,
    pub partial_rooms: usize,
    pub empty_rooms: usize,
}

impl MonthStats {
    /// Collected share of expected, rounded to a whole percent.
    pub fn collected_percent(&self) -> u32 {
        if self.expected > 0.0 {
            (self.collected / self.expected * 100.0).round() as u32
        } else {
            0
        }
    }
}
