use anyhow::Result;
use chrono::Utc;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::voyages::{Voyage, VoyageModel, VoyageStatus, VoyageUpdate};

/// Optional predicates for a voyage listing.
#[derive(Debug, Clone, Default)]
pub struct VoyageFilter {
    pub mmsi: Option<String>,
    pub year: Option<i32>,
    pub status: Option<VoyageStatus>,
}

#[derive(Clone)]
pub struct VoyagesRepository {
    pool: DbPool,
}

impl VoyagesRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Fetch the monthly ledger entry for (mmsi, year, month), creating it
    /// when absent. Creation is a conflict-tolerant insert against the
    /// primary key, so two concurrent callers cannot produce a duplicate:
    /// whoever loses the insert simply reads the winner's row. The flag
    /// reports whether this call created the entry.
    pub async fn get_or_create_monthly(
        &self,
        mmsi: &str,
        year: i32,
        month: u32,
        vessel_name: &str,
    ) -> Result<(Voyage, bool)> {
        use crate::schema::voyages;

        let Some(voyage) = Voyage::monthly(mmsi, year, month, vessel_name) else {
            anyhow::bail!("month {month} is out of range");
        };

        let pool = self.pool.clone();
        let voyage_id = voyage.id.clone();
        let model: VoyageModel = voyage.into();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let inserted = diesel::insert_into(voyages::table)
                .values(&model)
                .on_conflict(voyages::id)
                .do_nothing()
                .execute(&mut conn)?;

            let stored: VoyageModel = voyages::table.find(&voyage_id).first(&mut conn)?;

            Ok::<(Voyage, bool), anyhow::Error>((stored.into(), inserted > 0))
        })
        .await??;

        Ok(result)
    }

    /// Insert a fully-formed voyage. Used by the seeding routine.
    pub async fn insert_voyage(&self, voyage: Voyage) -> Result<()> {
        use crate::schema::voyages;

        let pool = self.pool.clone();
        let model: VoyageModel = voyage.into();

        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            diesel::insert_into(voyages::table)
                .values(&model)
                .execute(&mut conn)?;

            Ok::<(), anyhow::Error>(())
        })
        .await??;

        Ok(())
    }

    pub async fn get(&self, voyage_id: &str) -> Result<Option<Voyage>> {
        use crate::schema::voyages;

        let pool = self.pool.clone();
        let voyage_id = voyage_id.to_string();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let model: Option<VoyageModel> = voyages::table
                .find(&voyage_id)
                .first(&mut conn)
                .optional()?;

            Ok::<Option<VoyageModel>, anyhow::Error>(model)
        })
        .await??;

        Ok(result.map(Voyage::from))
    }

    pub async fn exists(&self, voyage_id: &str) -> Result<bool> {
        use crate::schema::voyages;

        let pool = self.pool.clone();
        let voyage_id = voyage_id.to_string();

        let count = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let count = voyages::table
                .find(&voyage_id)
                .count()
                .get_result::<i64>(&mut conn)?;

            Ok::<i64, anyhow::Error>(count)
        })
        .await??;

        Ok(count > 0)
    }

    /// List voyages, most recent departure first.
    pub async fn list(&self, filter: &VoyageFilter) -> Result<Vec<Voyage>> {
        use crate::schema::voyages::dsl::*;

        let pool = self.pool.clone();
        let filter = filter.clone();

        let results = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let mut query = voyages.into_boxed();
            if let Some(mmsi_filter) = filter.mmsi.filter(|m| !m.is_empty()) {
                query = query.filter(mmsi.eq(mmsi_filter));
            }
            if let Some(year_filter) = filter.year {
                query = query.filter(year.eq(year_filter));
            }
            if let Some(status_filter) = filter.status {
                query = query.filter(status.eq(status_filter.label().to_string()));
            }

            let models: Vec<VoyageModel> = query.order(departure_date.desc()).load(&mut conn)?;

            Ok::<Vec<VoyageModel>, anyhow::Error>(models)
        })
        .await??;

        Ok(results.into_iter().map(Voyage::from).collect())
    }

    /// Apply a partial update and stamp `updated_at`. Returns the updated
    /// voyage, or `None` when the id is unknown. Callers reject empty
    /// field sets before getting here.
    pub async fn update(&self, voyage_id: &str, fields: &VoyageUpdate) -> Result<Option<Voyage>> {
        use crate::schema::voyages;

        let pool = self.pool.clone();
        let voyage_id = voyage_id.to_string();
        let changes = fields.changeset();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::update(voyages::table.find(&voyage_id))
                .set((&changes, voyages::updated_at.eq(Utc::now())))
                .execute(&mut conn)?;

            if rows == 0 {
                return Ok::<Option<VoyageModel>, anyhow::Error>(None);
            }

            let model: VoyageModel = voyages::table.find(&voyage_id).first(&mut conn)?;
            Ok(Some(model))
        })
        .await??;

        Ok(result.map(Voyage::from))
    }

    pub async fn count_all(&self) -> Result<i64> {
        use crate::schema::voyages;

        let pool = self.pool.clone();

        let count = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let count = voyages::table.count().get_result::<i64>(&mut conn)?;

            Ok::<i64, anyhow::Error>(count)
        })
        .await??;

        Ok(count)
    }

    pub async fn count_with_status(&self, status_filter: VoyageStatus) -> Result<i64> {
        use crate::schema::voyages;

        let pool = self.pool.clone();

        let count = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let count = voyages::table
                .filter(voyages::status.eq(status_filter.label()))
                .count()
                .get_result::<i64>(&mut conn)?;

            Ok::<i64, anyhow::Error>(count)
        })
        .await??;

        Ok(count)
    }

    /// Sum of recorded catch across every voyage, in kilograms.
    pub async fn total_catch(&self) -> Result<f64> {
        use crate::schema::voyages;

        let pool = self.pool.clone();

        let total = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let total: Option<f64> = voyages::table
                .select(diesel::dsl::sum(voyages::catch_amount))
                .first(&mut conn)?;

            Ok::<f64, anyhow::Error>(total.unwrap_or(0.0))
        })
        .await??;

        Ok(total)
    }
}
