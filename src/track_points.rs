use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::track_points;

/// One timestamped position/speed/course sample along a voyage.
/// Write-once: points are appended in batches and never mutated.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = track_points)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TrackPoint {
    pub id: i32,
    pub voyage_id: String,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
    pub course: Option<f64>,
}

/// A position sample as submitted by a track ingestion request; the
/// owning voyage comes from the request path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPointInput {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
    pub course: Option<f64>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = track_points)]
pub struct NewTrackPoint {
    pub voyage_id: String,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
    pub course: Option<f64>,
}

impl NewTrackPoint {
    pub fn from_input(voyage_id: &str, input: TrackPointInput) -> Self {
        Self {
            voyage_id: voyage_id.to_string(),
            timestamp: input.timestamp,
            latitude: input.latitude,
            longitude: input.longitude,
            speed: input.speed,
            course: input.course,
        }
    }
}
