use std::sync::Arc;

use tracing::debug;

use crate::{
    domain::logic::period::month_range,
    entities::{
        MonthKey, RentChange, RentEditMode, RentStatement, RentStatementLine, Tenant,
    },
};

pub struct RentLedger;

impl RentLedger {
    /// Rent in effect for `month`: the amount of the latest change whose
    /// `from` is not after `month`, falling back to the baseline rent when
    /// no change applies yet. Entry order does not matter.
    pub fn rent_for_month(tenant: &Tenant, month: MonthKey) -> f64 {
        Self::applicable_change(&tenant.rent_changes, month)
            .map(|i| tenant.rent_changes[i].amount)
            .unwrap_or(tenant.rent)
    }

    /// Applies a rent edit made in `current` month. Returns the same `Arc`
    /// if the amount equals what is currently applicable.
    pub fn edit_rent(
        tenant: &Arc<Tenant>,
        amount: f64,
        mode: RentEditMode,
        current: MonthKey,
    ) -> Arc<Tenant> {
        if Self::rent_for_month(tenant, current) == amount {
            return Arc::clone(tenant);
        }
        let mut changes = tenant.rent_changes.clone();
        match mode {
            RentEditMode::FromThisMonth => {
                changes.retain(|c| c.from != current);
                changes.push(RentChange {
                    from: current,
                    amount,
                });
            }
            RentEditMode::CorrectMistake => match Self::applicable_change(&changes, current) {
                Some(i) => changes[i].amount = amount,
                None => {
                    let anchor = tenant.joining_month().unwrap_or(current);
                    match changes.iter_mut().find(|c| c.from == anchor) {
                        Some(existing) => existing.amount = amount,
                        None => changes.push(RentChange {
                            from: anchor,
                            amount,
                        }),
                    }
                }
            },
        }
        changes.sort_by_key(|c| c.from);
        debug!(tenant = %tenant.id, ?mode, %current, amount, "rent edited");
        Arc::new(Tenant {
            rent_changes: changes,
            ..(**tenant).clone()
        })
    }

    /// Flips the paid flag for `month`. Any month is accepted: future months
    /// record pre-payment, past months may be un-paid as a correction.
    pub fn toggle_paid(tenant: &Arc<Tenant>, month: MonthKey) -> Arc<Tenant> {
        let paid = tenant.is_paid(&month);
        Self::set_paid(tenant, month, !paid)
    }

    /// Sets the paid flag for `month`. Returns the same `Arc` if the stored
    /// flag already has that value.
    pub fn set_paid(tenant: &Arc<Tenant>, month: MonthKey, paid: bool) -> Arc<Tenant> {
        if tenant.rent_history.get(&month) == Some(&paid) {
            return Arc::clone(tenant);
        }
        let mut rent_history = tenant.rent_history.clone();
        rent_history.insert(month, paid);
        Arc::new(Tenant {
            rent_history,
            ..(**tenant).clone()
        })
    }

    /// Month-by-month view from joining through `current + lookahead`, most
    /// recent first. Only months up to `current` count as unpaid.
    pub fn statement(tenant: &Tenant, current: MonthKey, lookahead: u32) -> RentStatement {
        let range = month_range(tenant.joining_date, current, lookahead);
        let unpaid_count = range
            .iter()
            .filter(|m| **m <= current && !tenant.is_paid(m))
            .count();
        let months = range
            .into_iter()
            .rev()
            .map(|month| RentStatementLine {
                month,
                amount: Self::rent_for_month(tenant, month),
                paid: tenant.is_paid(&month),
                is_current: month == current,
            })
            .collect();
        RentStatement {
            months,
            unpaid_count,
        }
    }

    fn applicable_change(changes: &[RentChange], month: MonthKey) -> Option<usize> {
        changes
            .iter()
            .enumerate()
            .filter(|(_, c)| c.from <= month)
            .max_by_key(|(_, c)| c.from)
            .map(|(i, _)| i)
    }
}
