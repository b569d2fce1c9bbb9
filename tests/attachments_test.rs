mod common;

use chrono::Utc;
use common::TestDatabase;
use trawl::memos::NewVesselMemo;
use trawl::memos_repo::MemosRepository;
use trawl::registry::NewVesselRecord;
use trawl::registry_repo::{PageRequest, RegistryFilter, RegistryRepository};
use trawl::vessel_photos::NewVesselPhoto;
use trawl::vessel_photos_repo::VesselPhotosRepository;

async fn seeded_vessel(repo: &RegistryRepository) -> i32 {
    let now = Utc::now();
    repo.insert_census_rows(vec![NewVesselRecord {
        vessel_name: "수복호".to_string(),
        tonnage: None,
        length: None,
        engine_type: None,
        engine_count: None,
        engine_power_ps: None,
        engine_power_kw: None,
        engine_name: None,
        hull_material: None,
        registration_no: Some("GN-001".to_string()),
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
    }])
    .await
    .unwrap();

    let page = repo
        .list(&RegistryFilter::default(), PageRequest::new(None, None))
        .await
        .unwrap();
    page.data[0].record.id
}

fn photo(vessel_id: i32, filename: &str, primary: bool) -> NewVesselPhoto {
    NewVesselPhoto {
        vessel_id,
        filename: filename.to_string(),
        original_name: format!("original-{filename}"),
        file_path: format!("photos/{filename}"),
        file_size: Some(1024),
        mime_type: Some("image/jpeg".to_string()),
        is_primary: primary,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn memo_crud_round_trip() {
    let db = TestDatabase::new().unwrap();
    let registry = RegistryRepository::new(db.pool());
    let memos = MemosRepository::new(db.pool());
    let vessel_id = seeded_vessel(&registry).await;

    // Unknown vessel is refused by the foreign key, not a pre-check.
    assert!(
        memos
            .create(NewVesselMemo::new(9999, "없는 배".to_string()))
            .await
            .unwrap()
            .is_none()
    );

    let memo = memos
        .create(NewVesselMemo::new(vessel_id, "5월 피해 조사 예정".to_string()))
        .await
        .unwrap()
        .unwrap();

    let updated = memos
        .update(vessel_id, memo.id, "5월 피해 조사 완료".to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.content, "5월 피해 조사 완료");
    assert!(updated.updated_at >= memo.updated_at);

    // A memo is only addressable under its own vessel.
    assert!(memos.update(9999, memo.id, "x".to_string()).await.unwrap().is_none());

    assert_eq!(memos.for_vessel(vessel_id).await.unwrap().len(), 1);
    assert!(memos.delete(vessel_id, memo.id).await.unwrap());
    assert!(memos.for_vessel(vessel_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn setting_a_primary_photo_demotes_its_siblings() {
    let db = TestDatabase::new().unwrap();
    let registry = RegistryRepository::new(db.pool());
    let photos = VesselPhotosRepository::new(db.pool());
    let vessel_id = seeded_vessel(&registry).await;

    let first = photos
        .create(photo(vessel_id, "a.jpg", true))
        .await
        .unwrap()
        .unwrap();
    let second = photos
        .create(photo(vessel_id, "b.jpg", false))
        .await
        .unwrap()
        .unwrap();

    let promoted = photos
        .set_primary(vessel_id, second.id)
        .await
        .unwrap()
        .unwrap();
    assert!(promoted.is_primary);

    let listed = photos.for_vessel(vessel_id).await.unwrap();
    assert_eq!(listed.len(), 2);
    // Primary sorts first, and there is exactly one of them.
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed.iter().filter(|p| p.is_primary).count(), 1);
    assert!(!listed.iter().find(|p| p.id == first.id).unwrap().is_primary);

    assert!(photos.set_primary(vessel_id, 9999).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_a_photo_returns_the_row_for_disk_cleanup() {
    let db = TestDatabase::new().unwrap();
    let registry = RegistryRepository::new(db.pool());
    let photos = VesselPhotosRepository::new(db.pool());
    let vessel_id = seeded_vessel(&registry).await;

    let created = photos
        .create(photo(vessel_id, "a.jpg", true))
        .await
        .unwrap()
        .unwrap();

    let deleted = photos.delete(vessel_id, created.id).await.unwrap().unwrap();
    assert_eq!(deleted.file_path, "photos/a.jpg");
    assert!(photos.delete(vessel_id, created.id).await.unwrap().is_none());

    // Attachment tallies feed the registry read model.
    let record = registry.get(vessel_id).await.unwrap().unwrap();
    assert_eq!(record.photo_count, 0);
}

#[tokio::test]
async fn photo_counts_show_up_on_the_registry_read_model() {
    let db = TestDatabase::new().unwrap();
    let registry = RegistryRepository::new(db.pool());
    let photos = VesselPhotosRepository::new(db.pool());
    let vessel_id = seeded_vessel(&registry).await;

    photos
        .create(photo(vessel_id, "a.jpg", true))
        .await
        .unwrap()
        .unwrap();
    photos
        .create(photo(vessel_id, "b.jpg", false))
        .await
        .unwrap()
        .unwrap();

    let record = registry.get(vessel_id).await.unwrap().unwrap();
    assert_eq!(record.photo_count, 2);
    assert_eq!(record.file_count, 0);

    let page = registry
        .list(&RegistryFilter::default(), PageRequest::new(None, None))
        .await
        .unwrap();
    assert_eq!(page.data[0].photo_count, 2);
}
