mod common;

use chrono::Utc;
use common::TestDatabase;
use trawl::registry::{NewVesselRecord, VesselRecordUpdate};
use trawl::registry_repo::{PageRequest, RegistryFilter, RegistryRepository};

fn vessel(name: &str, registration: &str) -> NewVesselRecord {
    let now = Utc::now();
    NewVesselRecord {
        vessel_name: name.to_string(),
        tonnage: None,
        length: None,
        engine_type: None,
        engine_count: None,
        engine_power_ps: None,
        engine_power_kw: None,
        engine_name: None,
        hull_material: None,
        registration_no: Some(registration.to_string()),
        build_date: None,
        port: None,
        business_type: None,
        equipment_name: None,
        equipment_power: None,
        mmsi: None,
        license_local: None,
        license_start_local: None,
        license_end_local: None,
        license_province: None,
        license_start_province: None,
        license_end_province: None,
        group_name: None,
        fishing_hours: None,
        organization: None,
        owner_name: None,
        created_at: now,
        updated_at: now,
    }
}

fn filter_group(label: &str) -> RegistryFilter {
    RegistryFilter {
        group_name: Some(label.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn group_filter_matches_exact_labels_only() {
    let db = TestDatabase::new().unwrap();
    let repo = RegistryRepository::new(db.pool());

    let mut multi = vessel("수복호", "GN-001");
    multi.group_name = Some("A, B, C".to_string());
    let mut single = vessel("해진호", "GN-002");
    single.group_name = Some("AB".to_string());
    repo.insert_census_rows(vec![multi, single]).await.unwrap();

    for label in ["A", "B", "C"] {
        let page = repo
            .list(&filter_group(label), PageRequest::new(None, None))
            .await
            .unwrap();
        assert_eq!(page.total, 1, "label {label} should match the packed set");
        assert_eq!(page.data[0].record.vessel_name, "수복호");
    }

    let page = repo
        .list(&filter_group("AB"), PageRequest::new(None, None))
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].record.vessel_name, "해진호");

    let page = repo
        .list(&filter_group("A,"), PageRequest::new(None, None))
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn pagination_totals_come_from_the_filtered_set() {
    let db = TestDatabase::new().unwrap();
    let repo = RegistryRepository::new(db.pool());

    let mut rows = Vec::new();
    for i in 0..45 {
        let mut record = vessel(&format!("선단{i}호"), &format!("GN-{i:03}"));
        record.port = Some(if i < 25 { "속초항" } else { "주문진항" }.to_string());
        rows.push(record);
    }
    repo.insert_census_rows(rows).await.unwrap();

    let filter = RegistryFilter {
        port: Some("속초".to_string()),
        ..Default::default()
    };

    let first = repo
        .list(&filter, PageRequest::new(Some(1), Some(20)))
        .await
        .unwrap();
    assert_eq!(first.total, 25);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.data.len(), 20);

    let last = repo
        .list(&filter, PageRequest::new(Some(2), Some(20)))
        .await
        .unwrap();
    assert_eq!(last.data.len(), 5);

    let beyond = repo
        .list(&filter, PageRequest::new(Some(3), Some(20)))
        .await
        .unwrap();
    assert_eq!(beyond.data.len(), 0);
    assert_eq!(beyond.total, 25);
}

#[tokio::test]
async fn pagination_is_ordered_by_id_ascending() {
    let db = TestDatabase::new().unwrap();
    let repo = RegistryRepository::new(db.pool());

    let rows: Vec<NewVesselRecord> = (0..30)
        .map(|i| vessel(&format!("배{i}"), &format!("GN-{i:03}")))
        .collect();
    repo.insert_census_rows(rows).await.unwrap();

    let first = repo
        .list(&RegistryFilter::default(), PageRequest::new(Some(1), Some(10)))
        .await
        .unwrap();
    let second = repo
        .list(&RegistryFilter::default(), PageRequest::new(Some(2), Some(10)))
        .await
        .unwrap();

    let first_ids: Vec<i32> = first.data.iter().map(|r| r.record.id).collect();
    let second_ids: Vec<i32> = second.data.iter().map(|r| r.record.id).collect();
    assert!(first_ids.windows(2).all(|w| w[0] < w[1]));
    assert!(first_ids.last().unwrap() < second_ids.first().unwrap());
}

#[tokio::test]
async fn search_matches_name_mmsi_or_registration() {
    let db = TestDatabase::new().unwrap();
    let repo = RegistryRepository::new(db.pool());

    let mut by_name = vessel("수복호", "GN-100");
    by_name.mmsi = Some("440004950".to_string());
    let by_registration = vessel("해진호", "SC-200");
    repo.insert_census_rows(vec![by_name, by_registration])
        .await
        .unwrap();

    for (term, expected) in [("수복", "수복호"), ("440004", "수복호"), ("SC-2", "해진호")] {
        let filter = RegistryFilter {
            search: Some(term.to_string()),
            ..Default::default()
        };
        let page = repo.list(&filter, PageRequest::new(None, None)).await.unwrap();
        assert_eq!(page.total, 1, "search term {term}");
        assert_eq!(page.data[0].record.vessel_name, expected);
    }
}

#[tokio::test]
async fn facets_count_occurrences_and_split_group_sets() {
    let db = TestDatabase::new().unwrap();
    let repo = RegistryRepository::new(db.pool());

    let mut a = vessel("가호", "GN-001");
    a.port = Some("속초항".to_string());
    a.group_name = Some("1선단, 2선단".to_string());
    let mut b = vessel("나호", "GN-002");
    b.port = Some("속초항".to_string());
    b.group_name = Some("2선단".to_string());
    let mut c = vessel("다호", "GN-003");
    c.port = Some("주문진항".to_string());
    repo.insert_census_rows(vec![a, b, c]).await.unwrap();

    let ports = repo.port_facets().await.unwrap();
    assert_eq!(ports[0].value, "속초항");
    assert_eq!(ports[0].count, 2);
    assert_eq!(ports[1].value, "주문진항");
    assert_eq!(ports[1].count, 1);

    // One record per label it carries, labels ascending.
    let groups = repo.group_facets().await.unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!((groups[0].value.as_str(), groups[0].count), ("1선단", 1));
    assert_eq!((groups[1].value.as_str(), groups[1].count), ("2선단", 2));
}

#[tokio::test]
async fn update_applies_partial_fields_and_stamps_updated_at() {
    let db = TestDatabase::new().unwrap();
    let repo = RegistryRepository::new(db.pool());

    repo.insert_census_rows(vec![vessel("수복호", "GN-001")])
        .await
        .unwrap();
    let page = repo
        .list(&RegistryFilter::default(), PageRequest::new(None, None))
        .await
        .unwrap();
    let record = &page.data[0].record;
    let id = record.id;
    let created_at = record.created_at;

    let update = VesselRecordUpdate {
        organization: Some("속초수협".to_string()),
        group_name: Some("1선단".to_string()),
        ..Default::default()
    };
    let updated = repo.update(id, update).await.unwrap().unwrap();
    assert_eq!(updated.organization.as_deref(), Some("속초수협"));
    assert_eq!(updated.vessel_name, "수복호");
    assert!(updated.updated_at >= created_at);

    assert!(repo.update(9999, VesselRecordUpdate::default()).await.unwrap().is_none());
}

#[tokio::test]
async fn get_reports_fresh_attachment_counts() {
    let db = TestDatabase::new().unwrap();
    let repo = RegistryRepository::new(db.pool());

    repo.insert_census_rows(vec![vessel("수복호", "GN-001")])
        .await
        .unwrap();
    let page = repo
        .list(&RegistryFilter::default(), PageRequest::new(None, None))
        .await
        .unwrap();
    let id = page.data[0].record.id;

    let fetched = repo.get(id).await.unwrap().unwrap();
    assert_eq!(fetched.photo_count, 0);
    assert_eq!(fetched.file_count, 0);

    assert!(repo.get(9999).await.unwrap().is_none());
}
