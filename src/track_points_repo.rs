use anyhow::Result;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::track_points::{NewTrackPoint, TrackPoint};

#[derive(Clone)]
pub struct TrackPointsRepository {
    pool: DbPool,
}

impl TrackPointsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append a batch of points to a voyage's track. Points are immutable
    /// once written.
    pub async fn append(&self, points: Vec<NewTrackPoint>) -> Result<usize> {
        use crate::schema::track_points;

        if points.is_empty() {
            return Ok(0);
        }

        let pool = self.pool.clone();

        let inserted = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let inserted = diesel::insert_into(track_points::table)
                .values(&points)
                .execute(&mut conn)?;

            Ok::<usize, anyhow::Error>(inserted)
        })
        .await??;

        Ok(inserted)
    }

    /// All points of a voyage, ordered by timestamp ascending. This is
    /// the only read order the track is ever served in.
    pub async fn for_voyage(&self, voyage: &str) -> Result<Vec<TrackPoint>> {
        use crate::schema::track_points::dsl::*;

        let pool = self.pool.clone();
        let voyage = voyage.to_string();

        let points = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let points: Vec<TrackPoint> = track_points
                .filter(voyage_id.eq(&voyage))
                .order(timestamp.asc())
                .select(TrackPoint::as_select())
                .load(&mut conn)?;

            Ok::<Vec<TrackPoint>, anyhow::Error>(points)
        })
        .await??;

        Ok(points)
    }
}
