use std::fs;

use chrono::NaiveDate;
use fractic_pg_ledger::{
    entities::{bed_id, room_id, tenant_id, LedgerConfig, MonthKey, Tenancy, TenantData},
    ext::standard_layouts::ashiana_layout,
    repositories::{JsonFileSnapshotRepository, SnapshotRepository as _},
    util::{snapshot_from_json, snapshot_to_json, PgLedgerUtil},
};
use rstest::rstest;
use tempfile::tempdir;

fn month(s: &str) -> MonthKey {
    s.parse().unwrap()
}

const LEGACY_DOCUMENT: &str = r#"{
  "rooms": [
    {
      "id": "101",
      "floor": "1st Floor",
      "totalBeds": 3,
      "bookableAsRoom": false,
      "beds": [
        { "id": "101-1", "occupied": true, "tenantId": "a1", "defaultRent": "4,500" },
        { "id": "101-2", "occupied": true, "tenantId": null }
      ]
    },
    {
      "id": "102",
      "floor": "1st Floor",
      "totalBeds": 2,
      "bookableAsRoom": true,
      "beds": [
        { "id": "102-1", "occupied": true, "tenantId": "b2" },
        { "id": "102-2", "occupied": true, "tenantId": "b2" }
      ]
    }
  ],
  "tenants": [
    {
      "id": "a1",
      "name": "Smith, John",
      "rent": "4500",
      "deposit": null,
      "joiningDate": "2025-11-03T00:00:00.000Z",
      "vacateDate": "",
      "roomId": "101",
      "bedId": "101-1",
      "rentHistory": { "2025-11": true, "not-a-month": true, "2025-12": false },
      "rentChanges": [
        { "from": "2026-01", "amount": 5000 },
        { "from": "2025-11", "amount": 4500 },
        { "from": "garbage", "amount": 1 }
      ]
    },
    {
      "id": "b2",
      "name": "Family",
      "rent": 9000,
      "joiningDate": "2025-12-01",
      "roomId": "102",
      "roomBooked": true
    }
  ]
}"#;

const BEDLESS_ROOMMATES: &str = r#"{
  "rooms": [
    {
      "id": "101",
      "floor": "1st Floor",
      "totalBeds": 4,
      "beds": [
        { "id": "101-1", "occupied": true, "tenantId": "a" },
        { "id": "101-2", "occupied": true, "tenantId": "b" },
        { "id": "101-3", "occupied": false, "tenantId": null },
        { "id": "101-4", "occupied": false, "tenantId": null }
      ]
    },
    {
      "id": "102",
      "floor": "1st Floor",
      "totalBeds": 2,
      "bookableAsRoom": true,
      "beds": [
        { "id": "102-1", "occupied": true, "tenantId": "c" },
        { "id": "102-2", "occupied": true, "tenantId": "c" }
      ]
    }
  ],
  "tenants": [
    { "id": "a", "name": "Asha", "rent": 5000, "joiningDate": "2025-06-01" },
    { "id": "b", "name": "Bina", "rent": 5000, "joiningDate": "2025-07-01" },
    { "id": "c", "name": "Family", "rent": 9000, "joiningDate": "2025-08-01" },
    { "id": "gone", "name": "Gone", "rent": 4000, "active": false }
  ]
}"#;

#[rstest]
fn bedless_tenants_recover_their_placement_from_the_beds() {
    let snapshot = snapshot_from_json(BEDLESS_ROOMMATES).unwrap();

    let asha = snapshot.tenant(&tenant_id("a")).unwrap();
    assert_eq!(
        asha.tenancy,
        Tenancy::PerBed {
            bed_id: bed_id("101-1")
        }
    );
    assert_eq!(asha.room_id, room_id("101"));

    let family = snapshot.tenant(&tenant_id("c")).unwrap();
    assert_eq!(family.tenancy, Tenancy::WholeRoom);
    assert_eq!(family.room_id, room_id("102"));

    // Nothing references this one, so there is nothing to infer from.
    let gone = snapshot.tenant(&tenant_id("gone")).unwrap();
    assert_eq!(gone.tenancy, Tenancy::WholeRoom);
}

#[rstest]
#[tokio::test]
async fn vacating_a_bedless_tenant_leaves_roommates_alone() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pg.json");
    fs::write(&path, BEDLESS_ROOMMATES).unwrap();
    let ledger = PgLedgerUtil::open_json_file(&path, ashiana_layout(), LedgerConfig::default());

    let outcome = ledger
        .vacate_bed(&room_id("101"), &bed_id("101-1"), NaiveDate::from_ymd_opt(2026, 1, 31))
        .await
        .unwrap();
    assert!(outcome.changed);

    let snapshot = ledger.snapshot().await.unwrap();
    assert!(!snapshot.tenant(&tenant_id("a")).unwrap().active);
    assert!(snapshot.tenant(&tenant_id("b")).unwrap().active);
    let room = snapshot.room(&room_id("101")).unwrap();
    assert_eq!(room.bed(&bed_id("101-1")).unwrap().occupant, None);
    assert_eq!(room.bed(&bed_id("101-2")).unwrap().occupant, Some(tenant_id("b")));

    let outcome = ledger
        .clear_bed(&room_id("101"), &bed_id("101-2"))
        .await
        .unwrap();
    assert!(outcome.changed);
    assert!(outcome.snapshot.tenant(&tenant_id("a")).is_some());
    assert!(outcome.snapshot.tenant(&tenant_id("b")).is_none());
}

#[rstest]
#[tokio::test]
async fn subscribers_see_the_loaded_document_before_any_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pg.json");
    fs::write(&path, BEDLESS_ROOMMATES).unwrap();
    let repository = JsonFileSnapshotRepository::new(&path, ashiana_layout());
    let updates = repository.subscribe();

    repository.load().await.unwrap();
    assert_eq!(updates.borrow().rooms.len(), 2);
    assert_eq!(updates.borrow().tenants.len(), 4);
}

#[rstest]
#[tokio::test]
async fn first_load_seeds_file_from_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pg.json");
    let repository = JsonFileSnapshotRepository::new(&path, ashiana_layout());

    let snapshot = repository.load().await.unwrap();
    assert_eq!(snapshot.rooms.len(), 12);
    assert!(snapshot.tenants.is_empty());
    assert!(path.exists());

    let stored = fs::read_to_string(&path).unwrap();
    assert!(stored.contains("\"totalBeds\": 4"));
    assert!(stored.contains("\"bookableAsRoom\": true"));
}

#[rstest]
#[tokio::test]
async fn saved_state_survives_reopening() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pg.json");
    {
        let ledger = PgLedgerUtil::open_json_file(&path, ashiana_layout(), LedgerConfig::default());
        let outcome = ledger
            .book_bed(
                &room_id("103"),
                &bed_id("103-2"),
                TenantData {
                    name: "Asha".to_string(),
                    rent: 5000.0,
                    joining_date: NaiveDate::from_ymd_opt(2026, 1, 4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(outcome.changed);
    }

    let reopened = JsonFileSnapshotRepository::new(&path, ashiana_layout());
    let snapshot = reopened.load().await.unwrap();
    assert_eq!(snapshot.tenants.len(), 1);
    let tenant = &snapshot.tenants[0];
    assert_eq!(tenant.name, "Asha");
    assert_eq!(tenant.joining_date, NaiveDate::from_ymd_opt(2026, 1, 4));
    assert_eq!(tenant.rent_changes[0].from, month("2026-01"));
    let occupant = snapshot.occupant_of(&room_id("103"), &bed_id("103-2")).unwrap();
    assert_eq!(occupant.id, tenant.id);
}

#[rstest]
fn legacy_documents_load_leniently() {
    let snapshot = snapshot_from_json(LEGACY_DOCUMENT).unwrap();

    // Beds are padded to the room's total and occupancy follows the tenant
    // reference.
    let room = snapshot.room(&room_id("101")).unwrap();
    assert_eq!(room.total_beds(), 3);
    assert_eq!(room.occupied_beds(), 1);
    assert_eq!(room.bed(&bed_id("101-1")).unwrap().default_rent, Some(4500.0));
    assert_eq!(room.bed(&bed_id("101-3")).unwrap().occupant, None);

    let tenant = snapshot.tenant(&tenant_id("a1")).unwrap();
    assert_eq!(tenant.rent, 4500.0);
    assert_eq!(tenant.deposit, 0.0);
    assert!(tenant.active);
    assert_eq!(tenant.joining_date, NaiveDate::from_ymd_opt(2025, 11, 3));
    assert_eq!(tenant.vacate_date, None);
    assert_eq!(tenant.rent_history.len(), 2);
    assert!(tenant.is_paid(&month("2025-11")));
    let froms: Vec<String> = tenant.rent_changes.iter().map(|c| c.from.to_string()).collect();
    assert_eq!(froms, vec!["2025-11", "2026-01"]);

    let family = snapshot.tenant(&tenant_id("b2")).unwrap();
    assert_eq!(family.tenancy, Tenancy::WholeRoom);
}

#[rstest]
fn documents_round_trip_through_the_wire_format() {
    let snapshot = snapshot_from_json(LEGACY_DOCUMENT).unwrap();
    let json = snapshot_to_json(&snapshot).unwrap();
    assert!(json.contains("\"joiningDate\": \"2025-11-03\""));
    assert!(json.contains("\"roomBooked\": true"));

    let reloaded = snapshot_from_json(&json).unwrap();
    assert_eq!(*reloaded.rooms, *snapshot.rooms);
    assert_eq!(*reloaded.tenants, *snapshot.tenants);
}

#[rstest]
fn malformed_json_is_rejected() {
    assert!(snapshot_from_json("{ \"rooms\": [").is_err());
}
