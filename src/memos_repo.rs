use anyhow::Result;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::db::DbPool;
use crate::memos::{NewVesselMemo, VesselMemo};

#[derive(Clone)]
pub struct MemosRepository {
    pool: DbPool,
}

impl MemosRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Attach a memo to a vessel; `None` when the vessel does not exist.
    pub async fn create(&self, memo: NewVesselMemo) -> Result<Option<VesselMemo>> {
        use crate::schema::vessel_memos;

        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            match diesel::insert_into(vessel_memos::table)
                .values(&memo)
                .get_result::<VesselMemo>(&mut conn)
            {
                Ok(row) => Ok::<Option<VesselMemo>, anyhow::Error>(Some(row)),
                Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await??;

        Ok(result)
    }

    /// Memos for a vessel, newest first.
    pub async fn for_vessel(&self, vessel: i32) -> Result<Vec<VesselMemo>> {
        use crate::schema::vessel_memos::dsl::*;

        let pool = self.pool.clone();

        let memos = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let memos: Vec<VesselMemo> = vessel_memos
                .filter(vessel_id.eq(vessel))
                .order(created_at.desc())
                .select(VesselMemo::as_select())
                .load(&mut conn)?;

            Ok::<Vec<VesselMemo>, anyhow::Error>(memos)
        })
        .await??;

        Ok(memos)
    }

    /// Replace a memo's content and stamp `updated_at`. `None` when the
    /// memo does not exist under that vessel.
    pub async fn update(
        &self,
        vessel: i32,
        memo_id: i32,
        new_content: String,
    ) -> Result<Option<VesselMemo>> {
        use crate::schema::vessel_memos::dsl::*;

        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::update(
                vessel_memos
                    .filter(id.eq(memo_id))
                    .filter(vessel_id.eq(vessel)),
            )
            .set((content.eq(&new_content), updated_at.eq(Utc::now())))
            .execute(&mut conn)?;

            if rows == 0 {
                return Ok::<Option<VesselMemo>, anyhow::Error>(None);
            }

            let memo = vessel_memos
                .filter(id.eq(memo_id))
                .select(VesselMemo::as_select())
                .first(&mut conn)?;

            Ok(Some(memo))
        })
        .await??;

        Ok(result)
    }

    pub async fn delete(&self, vessel: i32, memo_id: i32) -> Result<bool> {
        use crate::schema::vessel_memos::dsl::*;

        let pool = self.pool.clone();

        let rows = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::delete(
                vessel_memos
                    .filter(id.eq(memo_id))
                    .filter(vessel_id.eq(vessel)),
            )
            .execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(rows)
        })
        .await??;

        Ok(rows > 0)
    }
}
