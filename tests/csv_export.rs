use std::{fs, sync::Arc};

use chrono::NaiveDate;
use fractic_pg_ledger::{
    entities::{
        bed_id, room_id, tenant_id, FixedClock, LedgerConfig, MonthKey, SequentialIdGenerator,
        TenantData,
    },
    export::{export_filename, generate_csv},
    ext::standard_layouts::ashiana_layout,
    repositories::InMemorySnapshotRepository,
    util::{seed_snapshot, PgLedgerUtil},
};
use rstest::{fixture, rstest};
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn booking(name: &str, rent: f64, joined: NaiveDate) -> TenantData {
    TenantData {
        name: name.to_string(),
        contact: "98450 00000".to_string(),
        rent,
        deposit: 10000.0,
        deposit_paid: true,
        joining_date: Some(joined),
        ..Default::default()
    }
}

#[fixture]
fn ledger() -> PgLedgerUtil<InMemorySnapshotRepository> {
    PgLedgerUtil::with_handlers(
        InMemorySnapshotRepository::seeded(&ashiana_layout()),
        LedgerConfig::default(),
        Arc::new(SequentialIdGenerator::new("t")),
        Arc::new(FixedClock(date(2026, 2, 21))),
    )
}

async fn populate(ledger: &PgLedgerUtil<InMemorySnapshotRepository>) {
    ledger
        .book_bed(
            &room_id("101"),
            &bed_id("101-1"),
            booking("Smith, John", 5000.0, date(2026, 1, 5)),
        )
        .await
        .unwrap();
    ledger
        .book_room(&room_id("102"), booking("Family", 11000.0, date(2026, 2, 1)))
        .await
        .unwrap();
    ledger
        .book_bed(
            &room_id("201"),
            &bed_id("201-1"),
            booking("Old Tenant", 4000.0, date(2025, 12, 1)),
        )
        .await
        .unwrap();
    ledger
        .vacate_bed(&room_id("201"), &bed_id("201-1"), Some(date(2026, 1, 31)))
        .await
        .unwrap();
    ledger
        .set_rent_paid(&tenant_id("t1"), month("2026-01"), true)
        .await
        .unwrap();
    ledger
        .set_rent_paid(&tenant_id("t2"), month("2026-03"), true)
        .await
        .unwrap();
}

#[rstest]
fn empty_snapshot_exports_headers_only() {
    let csv = generate_csv(
        &seed_snapshot(&ashiana_layout()),
        &LedgerConfig::default(),
        date(2026, 2, 21),
    )
    .unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "ASHIANA PG MANAGER — DATA EXPORT");
    assert_eq!(lines[1], "Exported on: 21 Feb 2026");
    assert_eq!(lines[2], "0 tenants total — 0 active  0 vacated");
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "TENANT REGISTER");
    assert!(lines[5].starts_with("Name,Contact,Room,Bed,Status,Joining Date"));
    assert_eq!(lines[6], "");
    assert_eq!(lines[7], "");
    assert_eq!(lines[8], "RENT HISTORY (month-by-month)");
    assert_eq!(lines[9], "Tenant,Room,Bed,Month,Amount (Rs),Status");
    assert_eq!(lines.len(), 10);
}

#[rstest]
#[tokio::test]
async fn register_lists_active_then_vacated(ledger: PgLedgerUtil<InMemorySnapshotRepository>) {
    populate(&ledger).await;
    let csv = ledger.export_csv().await.unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[2], "3 tenants total — 2 active  1 vacated");
    assert_eq!(
        lines[6],
        "\"Smith, John\",98450 00000,101,Bed 1,Active,05 Jan 2026,,5000,10000,0,Yes,No,1,1,5000,"
    );
    assert!(lines[7].starts_with("Family,98450 00000,102,Entire Room,Active,01 Feb 2026,,11000,"));
    assert!(lines[8].starts_with("Old Tenant,98450 00000,201,Bed 1,Vacated,01 Dec 2025,31 Jan 2026,4000,"));
}

#[rstest]
#[tokio::test]
async fn history_marks_each_month(ledger: PgLedgerUtil<InMemorySnapshotRepository>) {
    populate(&ledger).await;
    let csv = ledger.export_csv().await.unwrap();
    let history: Vec<&str> = csv
        .lines()
        .skip_while(|l| *l != "RENT HISTORY (month-by-month)")
        .skip(2)
        .collect();

    assert_eq!(
        &history[..3],
        &[
            "\"Smith, John\",101,Bed 1,Jan 2026,5000,Paid",
            "\"Smith, John\",101,Bed 1,Feb 2026,5000,Unpaid",
            "\"Smith, John\",101,Bed 1,Mar 2026,5000,Upcoming",
        ]
    );
    assert_eq!(
        &history[3..5],
        &[
            "Family,102,Entire Room,Feb 2026,11000,Unpaid",
            "Family,102,Entire Room,Mar 2026,11000,Pre-paid",
        ]
    );
    assert_eq!(history[5], "Old Tenant,201,Bed 1,Dec 2025,4000,Unpaid");
}

#[rstest]
#[tokio::test]
async fn written_export_carries_bom_and_dated_name(
    ledger: PgLedgerUtil<InMemorySnapshotRepository>,
) {
    populate(&ledger).await;
    let dir = tempdir().unwrap();
    let path = ledger.write_export(dir.path()).await.unwrap();

    assert_eq!(
        path.file_name().and_then(|n| n.to_str()),
        Some(export_filename("ashiana-pg", date(2026, 2, 21)).as_str())
    );
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with('\u{FEFF}'));
    assert_eq!(
        written.trim_start_matches('\u{FEFF}'),
        ledger.export_csv().await.unwrap()
    );
}
