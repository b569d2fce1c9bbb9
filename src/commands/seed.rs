use anyhow::Result;
use chrono::{TimeZone, Utc};
use tracing::info;

use crate::auctions::{Auction, AuctionCreate};
use crate::auctions_repo::AuctionsRepository;
use crate::db::DbPool;
use crate::expenses::{Expense, ExpenseCreate};
use crate::expenses_repo::ExpensesRepository;
use crate::voyages::{Voyage, VoyageStatus};
use crate::voyages_repo::VoyagesRepository;

/// Seed the voyage ledger with sample data for demo installs. A no-op
/// whenever the ledger already holds anything, so it is safe to run on
/// every start.
pub async fn handle_seed(pool: DbPool) -> Result<()> {
    let voyages = VoyagesRepository::new(pool.clone());

    let existing = voyages.count_all().await?;
    if existing > 0 {
        info!("Voyage ledger already holds {existing} voyages; nothing to seed");
        return Ok(());
    }

    let auctions = AuctionsRepository::new(pool.clone());
    let expenses = ExpensesRepository::new(pool);

    for voyage in sample_voyages() {
        voyages.insert_voyage(voyage).await?;
    }

    for create in sample_auctions() {
        auctions.create(Auction::from_create(create)).await?;
    }
    for create in sample_expenses() {
        expenses.create(Expense::from_create(create)).await?;
    }

    info!("Seeded sample voyages, auctions, and expenses");
    Ok(())
}

fn sample_voyages() -> Vec<Voyage> {
    let mut completed = Voyage::monthly("440004950", 2025, 4, "수복호")
        .expect("static sample month is valid");
    completed.departure_port = "속초항".to_string();
    completed.departure_date = Utc.with_ymd_and_hms(2025, 4, 3, 19, 30, 0).unwrap();
    completed.arrival_port = Some("속초항".to_string());
    completed.arrival_date = Some(Utc.with_ymd_and_hms(2025, 4, 9, 6, 0, 0).unwrap());
    completed.fishing_area = "동해 대화퇴".to_string();
    completed.catch_amount = 1850.0;
    completed.fish_species = "오징어, 참가자미".to_string();
    completed.status = VoyageStatus::Completed;

    let mut returned = Voyage::monthly("440004950", 2025, 5, "수복호")
        .expect("static sample month is valid");
    returned.departure_port = "속초항".to_string();
    returned.departure_date = Utc.with_ymd_and_hms(2025, 5, 11, 20, 0, 0).unwrap();
    returned.arrival_port = Some("주문진항".to_string());
    returned.arrival_date = Some(Utc.with_ymd_and_hms(2025, 5, 18, 5, 30, 0).unwrap());
    returned.fishing_area = "동해 왕돌초".to_string();
    returned.catch_amount = 920.0;
    returned.fish_species = "오징어".to_string();
    returned.status = VoyageStatus::Returned;

    let mut open = Voyage::monthly("440112233", 2025, 5, "해진호")
        .expect("static sample month is valid");
    open.departure_port = "주문진항".to_string();
    open.departure_date = Utc.with_ymd_and_hms(2025, 5, 27, 18, 45, 0).unwrap();
    open.fishing_area = "동해 중부".to_string();
    open.fish_species = "붉은대게".to_string();

    vec![completed, returned, open]
}

fn sample_auctions() -> Vec<AuctionCreate> {
    vec![
        AuctionCreate {
            voyage_id: Voyage::voyage_key("440004950", 2025, 4),
            auction_date: Utc.with_ymd_and_hms(2025, 4, 9, 7, 0, 0).unwrap(),
            auction_port: "속초공동어시장".to_string(),
            fish_species: "오징어".to_string(),
            quantity: 1500.0,
            unit_price: 12000.0,
            buyer: Some("속초수협".to_string()),
            note: None,
        },
        AuctionCreate {
            voyage_id: Voyage::voyage_key("440004950", 2025, 5),
            auction_date: Utc.with_ymd_and_hms(2025, 5, 18, 6, 30, 0).unwrap(),
            auction_port: "주문진어시장".to_string(),
            fish_species: "오징어".to_string(),
            quantity: 900.0,
            unit_price: 13500.0,
            buyer: Some("강릉수협".to_string()),
            note: Some("야간 조업분".to_string()),
        },
    ]
}

fn sample_expenses() -> Vec<ExpenseCreate> {
    vec![
        ExpenseCreate {
            voyage_id: Voyage::voyage_key("440004950", 2025, 4),
            expense_date: Utc.with_ymd_and_hms(2025, 4, 3, 10, 0, 0).unwrap(),
            category: "유류비".to_string(),
            description: Some("면세유 2드럼".to_string()),
            amount: 840_000.0,
            note: None,
        },
        ExpenseCreate {
            voyage_id: Voyage::voyage_key("440004950", 2025, 5),
            expense_date: Utc.with_ymd_and_hms(2025, 5, 11, 9, 0, 0).unwrap(),
            category: "어구비".to_string(),
            description: Some("채낚기 어구 수리".to_string()),
            amount: 215_000.0,
            note: None,
        },
    ]
}
