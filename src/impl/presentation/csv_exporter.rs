use std::{cmp::Reverse, sync::Arc};

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use fractic_server_error::ServerError;

use crate::{
    domain::logic::{period::month_range, rent_ledger::RentLedger},
    entities::{LedgerConfig, MonthKey, Snapshot, Tenant},
    errors::CsvWriteError,
    presentation::format::{format_date, format_month},
};

const REGISTER_HEADER: [&str; 16] = [
    "Name",
    "Contact",
    "Room",
    "Bed",
    "Status",
    "Joining Date",
    "Vacate Date",
    "Current Rent (Rs/month)",
    "Deposit (Rs)",
    "Caution Deposit (Rs)",
    "Deposit Paid",
    "Caution Deposit Paid",
    "Months Paid",
    "Months Unpaid",
    "Total Collected (Rs)",
    "Notes",
];

const HISTORY_HEADER: [&str; 6] = ["Tenant", "Room", "Bed", "Month", "Amount (Rs)", "Status"];

/// Renders the full tenant register and month-by-month rent history as one
/// CSV document.
pub(crate) struct CsvExporter<'a> {
    config: &'a LedgerConfig,
}

impl<'a> CsvExporter<'a> {
    pub(crate) fn new(config: &'a LedgerConfig) -> Self {
        Self { config }
    }

    pub(crate) fn generate(&self, snapshot: &Snapshot, today: NaiveDate) -> Result<String, ServerError> {
        let current = MonthKey::of(today);
        let (active, vacated) = ordered_tenants(&snapshot.tenants);
        let mut sheet = Sheet::default();

        sheet.row([self.config.export_title.as_str()])?;
        sheet.row([format!("Exported on: {}", format_date(Some(today)))])?;
        sheet.row([format!(
            "{} tenants total — {} active  {} vacated",
            snapshot.tenants.len(),
            active.len(),
            vacated.len()
        )])?;
        sheet.blank();

        let tenants: Vec<&Arc<Tenant>> = active.into_iter().chain(vacated).collect();

        sheet.row(["TENANT REGISTER"])?;
        sheet.row(REGISTER_HEADER)?;
        for t in &tenants {
            sheet.row(self.register_row(t, current))?;
        }
        sheet.blank();
        sheet.blank();

        sheet.row(["RENT HISTORY (month-by-month)"])?;
        sheet.row(HISTORY_HEADER)?;
        for t in &tenants {
            for month in self.months(t, current) {
                let paid = t.is_paid(&month);
                let status = match (month > current, paid) {
                    (true, true) => "Pre-paid",
                    (true, false) => "Upcoming",
                    (false, true) => "Paid",
                    (false, false) => "Unpaid",
                };
                sheet.row([
                    t.name.clone(),
                    t.room_id.to_string(),
                    t.tenancy.label(),
                    format_month(month),
                    RentLedger::rent_for_month(t, month).to_string(),
                    status.to_string(),
                ])?;
            }
        }

        Ok(sheet.lines.join("\n"))
    }

    fn register_row(&self, t: &Tenant, current: MonthKey) -> Vec<String> {
        let months = self.months(t, current);
        let paid: Vec<MonthKey> = months.iter().copied().filter(|m| t.is_paid(m)).collect();
        // Future unpaid months are upcoming, not unpaid.
        let unpaid_count = months
            .iter()
            .filter(|m| **m <= current && !t.is_paid(m))
            .count();
        let total_collected: f64 = paid.iter().map(|m| RentLedger::rent_for_month(t, *m)).sum();

        vec![
            t.name.clone(),
            t.contact.clone(),
            t.room_id.to_string(),
            t.tenancy.label(),
            if t.active { "Active" } else { "Vacated" }.to_string(),
            format_date(t.joining_date),
            t.vacate_date.map(|d| format_date(Some(d))).unwrap_or_default(),
            RentLedger::rent_for_month(t, current).to_string(),
            t.deposit.to_string(),
            t.caution_deposit.to_string(),
            yes_no(t.deposit_paid),
            yes_no(t.caution_deposit_paid),
            paid.len().to_string(),
            unpaid_count.to_string(),
            total_collected.to_string(),
            t.notes.clone(),
        ]
    }

    fn months(&self, t: &Tenant, current: MonthKey) -> Vec<MonthKey> {
        month_range(t.joining_date, current, self.config.lookahead_months)
    }
}

/// Full export document for `snapshot` as of `today`.
pub fn generate_csv(
    snapshot: &Snapshot,
    config: &LedgerConfig,
    today: NaiveDate,
) -> Result<String, ServerError> {
    CsvExporter::new(config).generate(snapshot, today)
}

/// `{prefix}-YYYY-MM-DD.csv`.
pub fn export_filename(prefix: &str, today: NaiveDate) -> String {
    format!("{}-{}.csv", prefix, today.format("%Y-%m-%d"))
}

/// Active tenants by room then case-insensitive name, followed by vacated
/// tenants, most recently vacated first.
fn ordered_tenants(tenants: &[Arc<Tenant>]) -> (Vec<&Arc<Tenant>>, Vec<&Arc<Tenant>>) {
    let (mut active, mut vacated): (Vec<&Arc<Tenant>>, Vec<&Arc<Tenant>>) =
        tenants.iter().partition(|t| t.active);
    active.sort_by_key(|t| (t.room_id.clone(), t.name.to_lowercase()));
    vacated.sort_by_key(|t| Reverse(t.vacate_date));
    (active, vacated)
}

fn yes_no(b: bool) -> String {
    let s = if b { "Yes" } else { "No" };
    s.to_string()
}

#[derive(Default)]
struct Sheet {
    lines: Vec<String>,
}

impl Sheet {
    /// Appends one record. Cells containing separators, quotes or newlines
    /// are quoted, with embedded quotes doubled.
    fn row<I, T>(&mut self, cells: I) -> Result<(), ServerError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer
            .write_record(cells)
            .map_err(|e| CsvWriteError::with_debug(&e))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| CsvWriteError::with_debug(e.error()))?;
        let mut line = String::from_utf8(bytes).map_err(|e| CsvWriteError::with_debug(&e))?;
        if line.ends_with('\n') {
            line.pop();
        }
        self.lines.push(line);
        Ok(())
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }
}
