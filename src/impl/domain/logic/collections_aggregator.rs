use std::sync::Arc;

use crate::{
    domain::logic::{period::month_range, rent_ledger::RentLedger},
    entities::{
        CollectionRow, CollectionSheet, MonthKey, MonthStats, MonthSummary, OccupancySummary,
        Room, RoomStatus, Tenant,
    },
};

pub struct CollectionsAggregator;

impl CollectionsAggregator {
    /// A tenant counts towards a month if they had joined by then and had not
    /// vacated before it.
    pub fn is_applicable(tenant: &Tenant, month: MonthKey) -> bool {
        let joined = tenant.joining_month().is_some_and(|j| j <= month);
        let not_vacated = tenant.vacate_month().map_or(true, |v| v >= month);
        joined && not_vacated
    }

    pub fn month_stats(tenants: &[Arc<Tenant>], month: MonthKey) -> MonthStats {
        tenants
            .iter()
            .filter(|t| Self::is_applicable(t, month))
            .fold(MonthStats::default(), |mut stats, t| {
                let rent = RentLedger::rent_for_month(t, month);
                stats.total += 1;
                stats.expected += rent;
                if t.is_paid(&month) {
                    stats.collected += rent;
                    stats.paid_count += 1;
                }
                stats
            })
    }

    /// Per-tenant rows for `month`, paid tenants first, then unpaid, each
    /// group in collection order.
    pub fn sheet(tenants: &[Arc<Tenant>], month: MonthKey) -> CollectionSheet {
        let (paid, unpaid): (Vec<CollectionRow>, Vec<CollectionRow>) = tenants
            .iter()
            .filter(|t| Self::is_applicable(t, month))
            .map(|t| CollectionRow {
                tenant_id: t.id.clone(),
                name: t.name.clone(),
                location: t.location_label(),
                rent: RentLedger::rent_for_month(t, month),
                paid: t.is_paid(&month),
            })
            .partition(|row| row.paid);
        CollectionSheet {
            month,
            rows: paid.into_iter().chain(unpaid).collect(),
            stats: Self::month_stats(tenants, month),
        }
    }

    /// Every month from the earliest joining date through `current`, most
    /// recent first, each with its aggregate stats.
    pub fn history(tenants: &[Arc<Tenant>], current: MonthKey) -> Vec<MonthSummary> {
        let earliest = tenants.iter().filter_map(|t| t.joining_date).min();
        month_range(earliest, current, 0)
            .into_iter()
            .rev()
            .map(|month| MonthSummary {
                month,
                is_current: month == current,
                stats: Self::month_stats(tenants, month),
            })
            .collect()
    }

    pub fn occupancy(rooms: &[Arc<Room>]) -> OccupancySummary {
        rooms.iter().fold(OccupancySummary::default(), |mut s, room| {
            s.total_beds += room.total_beds();
            s.occupied_beds += room.occupied_beds();
            match room.status() {
                RoomStatus::Full => s.full_rooms += 1,
                RoomStatus::Partial => s.partial_rooms += 1,
                RoomStatus::Empty => s.empty_rooms += 1,
            }
            s.vacant_beds = s.total_beds - s.occupied_beds;
            s
        })
    }

    /// Rooms grouped by floor, floors in first-seen order.
    pub fn rooms_by_floor(rooms: &[Arc<Room>]) -> Vec<(String, Vec<Arc<Room>>)> {
        let mut groups: Vec<(String, Vec<Arc<Room>>)> = Vec::new();
        for room in rooms {
            match groups.iter_mut().find(|(floor, _)| floor == &room.floor) {
                Some((_, group)) => group.push(Arc::clone(room)),
                None => groups.push((room.floor.clone(), vec![Arc::clone(room)])),
            }
        }
        groups
    }
}
