mod common;

use chrono::{TimeZone, Utc};
use common::TestDatabase;
use trawl::auctions::{Auction, AuctionCreate};
use trawl::auctions_repo::AuctionsRepository;
use trawl::commands::handle_seed;
use trawl::track_points::{NewTrackPoint, TrackPointInput};
use trawl::track_points_repo::TrackPointsRepository;
use trawl::voyages::{VoyageStatus, VoyageUpdate};
use trawl::voyages_repo::{VoyageFilter, VoyagesRepository};

#[tokio::test]
async fn monthly_get_or_create_is_idempotent() {
    let db = TestDatabase::new().unwrap();
    let repo = VoyagesRepository::new(db.pool());

    let (first, created) = repo
        .get_or_create_monthly("440004950", 2025, 3, "수복호")
        .await
        .unwrap();
    assert!(created);
    assert_eq!(first.id, "440004950-2025-003");
    assert_eq!(first.status, VoyageStatus::Fishing);
    assert_eq!(first.departure_port, "미상");
    assert_eq!(
        first.departure_date,
        Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
    );

    let (second, created) = repo
        .get_or_create_monthly("440004950", 2025, 3, "수복호")
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(second.id, first.id);
    assert_eq!(repo.count_all().await.unwrap(), 1);
}

#[tokio::test]
async fn out_of_range_months_are_rejected() {
    let db = TestDatabase::new().unwrap();
    let repo = VoyagesRepository::new(db.pool());

    assert!(
        repo.get_or_create_monthly("440004950", 2025, 13, "수복호")
            .await
            .is_err()
    );
    assert_eq!(repo.count_all().await.unwrap(), 0);
}

#[tokio::test]
async fn voyage_update_is_partial_and_stamps_updated_at() {
    let db = TestDatabase::new().unwrap();
    let repo = VoyagesRepository::new(db.pool());

    let (voyage, _) = repo
        .get_or_create_monthly("440004950", 2025, 3, "수복호")
        .await
        .unwrap();

    let update = VoyageUpdate {
        arrival_port: Some("속초항".to_string()),
        catch_amount: Some(1500.0),
        status: Some(VoyageStatus::Returned),
        ..Default::default()
    };
    let updated = repo.update(&voyage.id, &update).await.unwrap().unwrap();
    assert_eq!(updated.arrival_port.as_deref(), Some("속초항"));
    assert_eq!(updated.catch_amount, 1500.0);
    assert_eq!(updated.status, VoyageStatus::Returned);
    // Untouched fields survive.
    assert_eq!(updated.departure_port, voyage.departure_port);
    assert!(updated.updated_at >= voyage.updated_at);

    assert!(
        repo.update("440004950-2099-001", &update)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn voyage_list_filters_compose() {
    let db = TestDatabase::new().unwrap();
    let repo = VoyagesRepository::new(db.pool());

    repo.get_or_create_monthly("440004950", 2025, 3, "수복호")
        .await
        .unwrap();
    repo.get_or_create_monthly("440004950", 2024, 11, "수복호")
        .await
        .unwrap();
    repo.get_or_create_monthly("440112233", 2025, 3, "해진호")
        .await
        .unwrap();

    let all = repo.list(&VoyageFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let filter = VoyageFilter {
        mmsi: Some("440004950".to_string()),
        year: Some(2025),
        status: None,
    };
    let filtered = repo.list(&filter).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "440004950-2025-003");

    let filter = VoyageFilter {
        status: Some(VoyageStatus::Returned),
        ..Default::default()
    };
    assert!(repo.list(&filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn track_points_read_back_in_timestamp_order() {
    let db = TestDatabase::new().unwrap();
    let voyages = VoyagesRepository::new(db.pool());
    let tracks = TrackPointsRepository::new(db.pool());

    let (voyage, _) = voyages
        .get_or_create_monthly("440004950", 2025, 3, "수복호")
        .await
        .unwrap();

    // Appended out of order on purpose.
    let stamps = [
        Utc.with_ymd_and_hms(2025, 3, 2, 6, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 3, 2, 4, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 3, 2, 5, 0, 0).unwrap(),
    ];
    let points: Vec<NewTrackPoint> = stamps
        .iter()
        .map(|t| {
            NewTrackPoint::from_input(
                &voyage.id,
                TrackPointInput {
                    timestamp: *t,
                    latitude: 38.2,
                    longitude: 128.6,
                    speed: Some(7.5),
                    course: Some(90.0),
                },
            )
        })
        .collect();
    assert_eq!(tracks.append(points).await.unwrap(), 3);

    let read = tracks.for_voyage(&voyage.id).await.unwrap();
    let times: Vec<_> = read.iter().map(|p| p.timestamp).collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(times, sorted);
    assert_eq!(read.len(), 3);
}

#[tokio::test]
async fn sales_require_an_existing_voyage() {
    let db = TestDatabase::new().unwrap();
    let voyages = VoyagesRepository::new(db.pool());
    let auctions = AuctionsRepository::new(db.pool());

    let orphan = Auction::from_create(AuctionCreate {
        voyage_id: "440004950-2025-003".to_string(),
        auction_date: Utc.with_ymd_and_hms(2025, 3, 9, 7, 0, 0).unwrap(),
        auction_port: "속초공동어시장".to_string(),
        fish_species: "오징어".to_string(),
        quantity: 100.0,
        unit_price: 10000.0,
        buyer: None,
        note: None,
    });
    assert!(auctions.create(orphan.clone()).await.unwrap().is_none());

    voyages
        .get_or_create_monthly("440004950", 2025, 3, "수복호")
        .await
        .unwrap();
    let recorded = auctions.create(orphan).await.unwrap().unwrap();
    assert_eq!(recorded.total_price, 1_000_000.0);

    assert_eq!(auctions.total_revenue().await.unwrap(), 1_000_000.0);
    assert!(auctions.delete(&recorded.id).await.unwrap());
    assert!(!auctions.delete(&recorded.id).await.unwrap());
}

#[tokio::test]
async fn seeding_only_fills_an_empty_ledger() {
    let db = TestDatabase::new().unwrap();
    let voyages = VoyagesRepository::new(db.pool());
    let auctions = AuctionsRepository::new(db.pool());

    handle_seed(db.pool()).await.unwrap();
    let seeded = voyages.count_all().await.unwrap();
    assert!(seeded > 0);
    assert!(auctions.total_revenue().await.unwrap() > 0.0);

    // A second run must not duplicate anything.
    handle_seed(db.pool()).await.unwrap();
    assert_eq!(voyages.count_all().await.unwrap(), seeded);

    let active = voyages
        .count_with_status(VoyageStatus::Fishing)
        .await
        .unwrap();
    assert_eq!(active, 1);
}
