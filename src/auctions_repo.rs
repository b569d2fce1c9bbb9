use anyhow::Result;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::auctions::Auction;
use crate::db::DbPool;

#[derive(Clone)]
pub struct AuctionsRepository {
    pool: DbPool,
}

impl AuctionsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Record an auction sale. The voyage foreign key is the existence
    /// check: an unknown voyage surfaces as `None` rather than being
    /// pre-checked in a separate read.
    pub async fn create(&self, auction: Auction) -> Result<Option<Auction>> {
        use crate::schema::auctions;

        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            match diesel::insert_into(auctions::table)
                .values(&auction)
                .execute(&mut conn)
            {
                Ok(_) => Ok::<Option<Auction>, anyhow::Error>(Some(auction)),
                Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await??;

        Ok(result)
    }

    /// List auctions, oldest first, optionally for one voyage.
    pub async fn list(&self, voyage: Option<String>) -> Result<Vec<Auction>> {
        use crate::schema::auctions::dsl::*;

        let pool = self.pool.clone();

        let results = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let mut query = auctions.into_boxed();
            if let Some(voyage) = voyage.filter(|v| !v.is_empty()) {
                query = query.filter(voyage_id.eq(voyage));
            }

            let rows: Vec<Auction> = query
                .order(auction_date.asc())
                .select(Auction::as_select())
                .load(&mut conn)?;

            Ok::<Vec<Auction>, anyhow::Error>(rows)
        })
        .await??;

        Ok(results)
    }

    pub async fn delete(&self, auction_id: &str) -> Result<bool> {
        use crate::schema::auctions::dsl::*;

        let pool = self.pool.clone();
        let auction_id = auction_id.to_string();

        let rows = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::delete(auctions.filter(id.eq(&auction_id))).execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows > 0)
    }

    /// Sum of auction revenue across all voyages.
    pub async fn total_revenue(&self) -> Result<f64> {
        use crate::schema::auctions;

        let pool = self.pool.clone();

        let total = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let total: Option<f64> = auctions::table
                .select(diesel::dsl::sum(auctions::total_price))
                .first(&mut conn)?;

            Ok::<f64, anyhow::Error>(total.unwrap_or(0.0))
        })
        .await??;

        Ok(total)
    }
}
