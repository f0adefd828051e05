use std::sync::Arc;

use chrono::NaiveDate;
use fractic_pg_ledger::{
    entities::{
        bed_id, room_id, tenant_id, FixedClock, LedgerConfig, MonthKey, RentEditMode,
        SequentialIdGenerator, TenantData, TenantUpdate,
    },
    ext::standard_layouts::ashiana_layout,
    repositories::InMemorySnapshotRepository,
    util::PgLedgerUtil,
};
use rstest::{fixture, rstest};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn booking(name: &str, rent: f64, joined: NaiveDate) -> TenantData {
    TenantData {
        name: name.to_string(),
        rent,
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
        Arc::new(FixedClock(date(2026, 3, 15))),
    )
}

#[rstest]
#[tokio::test]
async fn mutations_persist_and_noops_skip_the_save(ledger: PgLedgerUtil<InMemorySnapshotRepository>) {
    let outcome = ledger
        .book_bed(
            &room_id("101"),
            &bed_id("101-1"),
            booking("Asha", 5000.0, date(2026, 1, 10)),
        )
        .await
        .unwrap();
    assert!(outcome.changed);
    assert_eq!(ledger.repository().save_count(), 1);

    let outcome = ledger
        .book_bed(
            &room_id("101"),
            &bed_id("101-1"),
            booking("Bina", 5000.0, date(2026, 1, 10)),
        )
        .await
        .unwrap();
    assert!(!outcome.changed);
    assert_eq!(ledger.repository().save_count(), 1);

    let stored = ledger.snapshot().await.unwrap();
    assert_eq!(stored.tenants.len(), 1);
    assert_eq!(stored.tenants[0].name, "Asha");
}

#[rstest]
#[tokio::test]
async fn subscribers_see_saved_snapshots(ledger: PgLedgerUtil<InMemorySnapshotRepository>) {
    let mut updates = ledger.subscribe();
    ledger
        .book_room(&room_id("206"), booking("Family", 10000.0, date(2026, 3, 1)))
        .await
        .unwrap();
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow().tenants.len(), 1);
}

#[rstest]
#[tokio::test]
async fn collection_sheet_and_history(ledger: PgLedgerUtil<InMemorySnapshotRepository>) {
    ledger
        .book_bed(
            &room_id("101"),
            &bed_id("101-1"),
            booking("Asha", 5000.0, date(2026, 1, 10)),
        )
        .await
        .unwrap();
    ledger
        .book_bed(
            &room_id("101"),
            &bed_id("101-2"),
            booking("Bina", 6000.0, date(2026, 2, 1)),
        )
        .await
        .unwrap();
    ledger
        .toggle_rent_paid(&tenant_id("t2"), month("2026-03"))
        .await
        .unwrap();

    let sheet = ledger.collection_sheet(None).await.unwrap();
    assert_eq!(sheet.month, month("2026-03"));
    let names: Vec<&str> = sheet.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Bina", "Asha"]);
    assert_eq!(sheet.stats.expected, 11000.0);
    assert_eq!(sheet.stats.collected, 6000.0);

    let january = ledger
        .collection_sheet(Some(month("2026-01")))
        .await
        .unwrap();
    assert_eq!(january.rows.len(), 1);

    let history = ledger.collection_history().await.unwrap();
    let months: Vec<String> = history.iter().map(|s| s.month.to_string()).collect();
    assert_eq!(months, vec!["2026-03", "2026-02", "2026-01"]);
    assert!(history[0].is_current);
}

#[rstest]
#[tokio::test]
async fn rent_statement_reflects_edits(ledger: PgLedgerUtil<InMemorySnapshotRepository>) {
    ledger
        .book_bed(
            &room_id("201"),
            &bed_id("201-1"),
            booking("Asha", 5000.0, date(2026, 1, 10)),
        )
        .await
        .unwrap();
    ledger
        .edit_rent(&tenant_id("t1"), 5500.0, RentEditMode::FromThisMonth)
        .await
        .unwrap();
    ledger
        .set_rent_paid(&tenant_id("t1"), month("2026-01"), true)
        .await
        .unwrap();

    let statement = ledger
        .rent_statement(&tenant_id("t1"))
        .await
        .unwrap()
        .unwrap();
    let lines: Vec<(String, f64)> = statement
        .months
        .iter()
        .map(|l| (l.month.to_string(), l.amount))
        .collect();
    assert_eq!(
        lines,
        vec![
            ("2026-04".to_string(), 5500.0),
            ("2026-03".to_string(), 5500.0),
            ("2026-02".to_string(), 5000.0),
            ("2026-01".to_string(), 5000.0),
        ]
    );
    assert_eq!(statement.unpaid_count, 2);

    assert!(ledger
        .rent_statement(&tenant_id("nobody"))
        .await
        .unwrap()
        .is_none());
}

#[rstest]
#[tokio::test]
async fn unchanged_rent_edit_is_not_saved(ledger: PgLedgerUtil<InMemorySnapshotRepository>) {
    ledger
        .book_bed(
            &room_id("201"),
            &bed_id("201-1"),
            booking("Asha", 5000.0, date(2026, 1, 10)),
        )
        .await
        .unwrap();
    let outcome = ledger
        .edit_rent(&tenant_id("t1"), 5000.0, RentEditMode::CorrectMistake)
        .await
        .unwrap();
    assert!(!outcome.changed);
    assert_eq!(ledger.repository().save_count(), 1);
}

#[rstest]
#[tokio::test]
async fn vacate_and_occupancy(ledger: PgLedgerUtil<InMemorySnapshotRepository>) {
    ledger
        .book_room(&room_id("102"), booking("Family", 11000.0, date(2026, 2, 1)))
        .await
        .unwrap();
    ledger
        .book_bed(
            &room_id("101"),
            &bed_id("101-4"),
            booking("Asha", 5000.0, date(2026, 2, 1)),
        )
        .await
        .unwrap();

    let occupancy = ledger.occupancy().await.unwrap();
    assert_eq!(occupancy.total_beds, 22);
    assert_eq!(occupancy.occupied_beds, 3);
    assert_eq!(occupancy.vacant_beds, 19);
    assert_eq!(occupancy.full_rooms, 1);
    assert_eq!(occupancy.partial_rooms, 1);
    assert_eq!(occupancy.empty_rooms, 10);

    ledger.vacate_room(&room_id("102"), None).await.unwrap();
    let outcome = ledger
        .clear_bed(&room_id("101"), &bed_id("101-4"))
        .await
        .unwrap();
    assert!(outcome.changed);
    assert_eq!(outcome.snapshot.tenants.len(), 1);
    assert_eq!(outcome.snapshot.tenants[0].vacate_date, Some(date(2026, 3, 15)));
    assert_eq!(ledger.occupancy().await.unwrap().occupied_beds, 0);

    let outcome = ledger.clear_room(&room_id("102")).await.unwrap();
    assert!(!outcome.changed);
}

#[rstest]
#[tokio::test]
async fn tenant_updates_and_default_rent(ledger: PgLedgerUtil<InMemorySnapshotRepository>) {
    ledger
        .book_bed(
            &room_id("D2"),
            &bed_id("D2-1"),
            booking("Asha", 4000.0, date(2026, 3, 1)),
        )
        .await
        .unwrap();
    let outcome = ledger
        .update_tenant(
            &tenant_id("t1"),
            TenantUpdate {
                contact: Some("98450 11111".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(outcome.changed);
    assert_eq!(outcome.snapshot.tenants[0].contact, "98450 11111");

    let outcome = ledger
        .update_tenant(&tenant_id("t1"), TenantUpdate::default())
        .await
        .unwrap();
    assert!(!outcome.changed);

    let outcome = ledger
        .set_default_rent(&room_id("D2"), &bed_id("D2-2"), Some(4200.0))
        .await
        .unwrap();
    assert!(outcome.changed);
    let room = outcome.snapshot.room(&room_id("D2")).unwrap();
    assert_eq!(room.bed(&bed_id("D2-2")).unwrap().default_rent, Some(4200.0));
}
