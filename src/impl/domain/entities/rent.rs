use super::month_key::MonthKey;

/// The two supported ways of changing a tenant's rent.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RentEditMode {
    /// Start a new change point at the current month. Earlier months keep
    /// their amounts.
    FromThisMonth,
    /// Overwrite the amount of the currently applicable change in place,
    /// retroactively re-pricing every month it covers.
    CorrectMistake,
}

/// Per-tenant month-by-month view of rent and payment status.
#[derive(Debug, PartialEq, Clone)]
pub struct RentStatement {
    /// Most recent first.
    pub months: Vec<RentStatementLine>,
    pub unpaid_count: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct RentStatementLine {
    pub month: MonthKey,
    pub amount: f64,
    pub paid: bool,
    pub is_current: bool,
}
