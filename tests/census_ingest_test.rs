mod common;

use std::path::PathBuf;

use common::TestDatabase;
use trawl::census::ingest_census;
use trawl::registry_repo::{PageRequest, RegistryFilter, RegistryRepository};

const HEADER: &str = "선명,톤수,길이,엔진종류,엔진갯수,엔진출력PS,엔진출력KW,선질,등록번호,건조일시,선적지,업종,장비명,출력,MMSI,어업인허가(시군구),허가시작일(시군구),허가종료일(시군구),어업인허가(시도),허가시작일(시도),허가종료일(시도)";

fn write_census(dir: &tempfile::TempDir, name: &str, rows: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    std::fs::write(&path, content).expect("census fixture should write");
    path
}

#[tokio::test]
async fn ingesting_twice_without_force_is_a_no_op() {
    let db = TestDatabase::new().unwrap();
    let repo = RegistryRepository::new(db.pool());
    let dir = tempfile::tempdir().unwrap();

    let census = write_census(
        &dir,
        "census.csv",
        &[
            "수복호,9.77,20.5,디젤,1,350,257.4,FRP,GN-2020-001,2020-03-15,속초항,채낚기,집어등,30kW,440004950,유효,2023-01-01,2025-12-31,유효,2023-01-01,2025-12-31",
            "해진호,12.3,23.1,디젤,2,500,367.7,강선,GN-2019-042,2019-07-01,주문진항,자망,양망기,15kW,440112233,유효,2024-01-01,2026-12-31,-,-,-",
        ],
    );

    let first = ingest_census(&repo, &census, false).await.unwrap();
    assert!(first.success);
    assert_eq!(first.inserted_count, 2);
    assert_eq!(repo.count_all().await.unwrap(), 2);

    let second = ingest_census(&repo, &census, false).await.unwrap();
    assert!(second.success);
    assert_eq!(second.inserted_count, 2);
    assert!(second.message.contains("already holds"));
    assert_eq!(repo.count_all().await.unwrap(), 2);
}

#[tokio::test]
async fn force_replaces_the_whole_snapshot() {
    let db = TestDatabase::new().unwrap();
    let repo = RegistryRepository::new(db.pool());
    let dir = tempfile::tempdir().unwrap();

    let old = write_census(
        &dir,
        "old.csv",
        &[
            "수복호,9.77,20.5,디젤,1,350,257.4,FRP,GN-2020-001,2020-03-15,속초항,채낚기,집어등,30kW,440004950,유효,2023-01-01,2025-12-31,유효,2023-01-01,2025-12-31",
            "해진호,12.3,23.1,디젤,2,500,367.7,강선,GN-2019-042,2019-07-01,주문진항,자망,양망기,15kW,440112233,유효,2024-01-01,2026-12-31,-,-,-",
        ],
    );
    ingest_census(&repo, &old, false).await.unwrap();

    let new = write_census(
        &dir,
        "new.csv",
        &[
            "동해호,7.9,18.2,디젤,1,280,205.9,FRP,GN-2021-007,2021-05-20,묵호항,연승,양승기,10kW,440556677,유효,2024-06-01,2026-05-31,-,-,-",
        ],
    );
    let report = ingest_census(&repo, &new, true).await.unwrap();
    assert!(report.success);
    assert_eq!(report.inserted_count, 1);
    assert_eq!(repo.count_all().await.unwrap(), 1);

    let page = repo
        .list(&RegistryFilter::default(), PageRequest::new(None, None))
        .await
        .unwrap();
    assert_eq!(page.data[0].record.vessel_name, "동해호");
}

#[tokio::test]
async fn duplicate_registration_numbers_are_skipped_not_fatal() {
    let db = TestDatabase::new().unwrap();
    let repo = RegistryRepository::new(db.pool());
    let dir = tempfile::tempdir().unwrap();

    let census = write_census(
        &dir,
        "census.csv",
        &[
            "수복호,9.77,20.5,디젤,1,350,257.4,FRP,GN-2020-001,2020-03-15,속초항,채낚기,집어등,30kW,440004950,유효,2023-01-01,2025-12-31,유효,2023-01-01,2025-12-31",
            "수복호2,8.5,19.0,디젤,1,300,220.6,FRP,GN-2020-001,2020-04-01,속초항,채낚기,집어등,20kW,440004951,유효,2023-01-01,2025-12-31,-,-,-",
            "해진호,12.3,23.1,디젤,2,500,367.7,강선,GN-2019-042,2019-07-01,주문진항,자망,양망기,15kW,440112233,유효,2024-01-01,2026-12-31,-,-,-",
        ],
    );

    let report = ingest_census(&repo, &census, false).await.unwrap();
    assert!(report.success);
    assert_eq!(report.inserted_count, 2);
    assert_eq!(repo.count_all().await.unwrap(), 2);
}

#[tokio::test]
async fn bad_cells_become_null_and_the_row_still_lands() {
    let db = TestDatabase::new().unwrap();
    let repo = RegistryRepository::new(db.pool());
    let dir = tempfile::tempdir().unwrap();

    let census = write_census(
        &dir,
        "census.csv",
        &[
            // Tonnage with a thousands separator, dash-sentinel length,
            // unparseable engine count.
            "수복호,\"1,234.5\",-,디젤,abc,350,257.4,FRP,GN-2020-001,2020-03-15,속초항,채낚기,집어등,30kW,440004950,유효,2023-01-01,2025-12-31,-,-,-",
        ],
    );

    let report = ingest_census(&repo, &census, false).await.unwrap();
    assert_eq!(report.inserted_count, 1);

    let page = repo
        .list(&RegistryFilter::default(), PageRequest::new(None, None))
        .await
        .unwrap();
    let record = &page.data[0].record;
    assert_eq!(record.tonnage, Some(1234.5));
    assert_eq!(record.length, None);
    assert_eq!(record.engine_count, None);
    assert_eq!(record.engine_power_ps, Some(350.0));
    assert_eq!(record.license_province, None);
}

#[tokio::test]
async fn rows_without_a_vessel_name_are_skipped() {
    let db = TestDatabase::new().unwrap();
    let repo = RegistryRepository::new(db.pool());
    let dir = tempfile::tempdir().unwrap();

    let census = write_census(
        &dir,
        "census.csv",
        &[
            "-,9.77,20.5,디젤,1,350,257.4,FRP,GN-2020-001,2020-03-15,속초항,채낚기,집어등,30kW,440004950,유효,2023-01-01,2025-12-31,-,-,-",
            "해진호,12.3,23.1,디젤,2,500,367.7,강선,GN-2019-042,2019-07-01,주문진항,자망,양망기,15kW,440112233,유효,2024-01-01,2026-12-31,-,-,-",
        ],
    );

    let report = ingest_census(&repo, &census, false).await.unwrap();
    assert_eq!(report.inserted_count, 1);
    assert_eq!(repo.count_all().await.unwrap(), 1);
}

#[tokio::test]
async fn an_unreadable_source_is_the_only_hard_failure() {
    let db = TestDatabase::new().unwrap();
    let repo = RegistryRepository::new(db.pool());

    let missing = PathBuf::from("/nonexistent/census.csv");
    assert!(ingest_census(&repo, &missing, false).await.is_err());
    assert_eq!(repo.count_all().await.unwrap(), 0);
}
