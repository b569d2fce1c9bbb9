use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::track_points::{NewTrackPoint, TrackPoint, TrackPointInput};
use crate::track_points_repo::TrackPointsRepository;
use crate::voyages::{Voyage, VoyageStatus, VoyageUpdate};
use crate::voyages_repo::{VoyageFilter, VoyagesRepository};
use crate::web::AppState;

use super::json_error;

#[derive(Debug, Deserialize)]
pub struct VoyageListQuery {
    pub mmsi: Option<String>,
    pub year: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoyageList {
    pub data: Vec<Voyage>,
    pub total: usize,
}

pub async fn list_voyages(
    State(state): State<AppState>,
    Query(query): Query<VoyageListQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(label) => match VoyageStatus::from_label(label) {
            Some(status) => Some(status),
            None => {
                return json_error(StatusCode::BAD_REQUEST, "Unknown voyage status")
                    .into_response();
            }
        },
        None => None,
    };

    let repo = VoyagesRepository::new(state.pool);
    let filter = VoyageFilter {
        mmsi: query.mmsi,
        year: query.year,
        status,
    };

    match repo.list(&filter).await {
        Ok(voyages) => Json(VoyageList {
            total: voyages.len(),
            data: voyages,
        })
        .into_response(),
        Err(e) => {
            error!("Failed to list voyages: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list voyages").into_response()
        }
    }
}

/// A voyage with its full track embedded, points in timestamp order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoyageDetail {
    #[serde(flatten)]
    pub voyage: Voyage,
    pub track_points: Vec<TrackPoint>,
}

pub async fn get_voyage(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let voyages = VoyagesRepository::new(state.pool.clone());
    let tracks = TrackPointsRepository::new(state.pool);

    let voyage = match voyages.get(&id).await {
        Ok(Some(voyage)) => voyage,
        Ok(None) => {
            return json_error(StatusCode::NOT_FOUND, "Voyage not found").into_response();
        }
        Err(e) => {
            error!("Failed to get voyage {id}: {e}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to get voyage")
                .into_response();
        }
    };

    match tracks.for_voyage(&id).await {
        Ok(track_points) => Json(VoyageDetail {
            voyage,
            track_points,
        })
        .into_response(),
        Err(e) => {
            error!("Failed to load track for voyage {id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load voyage track")
                .into_response()
        }
    }
}

pub async fn update_voyage(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<VoyageUpdate>,
) -> impl IntoResponse {
    if update.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "No fields to update").into_response();
    }

    let repo = VoyagesRepository::new(state.pool);

    match repo.update(&id, &update).await {
        Ok(Some(voyage)) => Json(voyage).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Voyage not found").into_response(),
        Err(e) => {
            error!("Failed to update voyage {id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update voyage")
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyVoyageQuery {
    pub mmsi: String,
    pub year: i32,
    pub month: u32,
    pub vessel_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyVoyageResponse {
    pub data: Voyage,
    pub created: bool,
}

/// Fetch or create the monthly ledger entry for a vessel. Two identical
/// requests return the same voyage; only the first reports `created`.
pub async fn create_monthly_voyage(
    State(state): State<AppState>,
    Query(query): Query<MonthlyVoyageQuery>,
) -> impl IntoResponse {
    if query.mmsi.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "MMSI must not be empty").into_response();
    }
    if !(1..=12).contains(&query.month) {
        return json_error(StatusCode::BAD_REQUEST, "Month must be between 1 and 12")
            .into_response();
    }

    let repo = VoyagesRepository::new(state.pool);
    let vessel_name = query.vessel_name.unwrap_or_else(|| query.mmsi.clone());

    match repo
        .get_or_create_monthly(&query.mmsi, query.year, query.month, &vessel_name)
        .await
    {
        Ok((voyage, created)) => {
            let status = if created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(MonthlyVoyageResponse { data: voyage, created })).into_response()
        }
        Err(e) => {
            error!(
                "Failed to get or create voyage for {} {}-{}: {e}",
                query.mmsi, query.year, query.month
            );
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to get or create monthly voyage",
            )
            .into_response()
        }
    }
}

/// Append a batch of track points to a voyage. Points are write-once;
/// there is no update or delete for them.
pub async fn append_track_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(points): Json<Vec<TrackPointInput>>,
) -> impl IntoResponse {
    if points.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "No track points supplied").into_response();
    }

    let voyages = VoyagesRepository::new(state.pool.clone());
    match voyages.exists(&id).await {
        Ok(true) => {}
        Ok(false) => {
            return json_error(StatusCode::NOT_FOUND, "Voyage not found").into_response();
        }
        Err(e) => {
            error!("Failed to check voyage {id}: {e}");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to append track points",
            )
            .into_response();
        }
    }

    let new_points: Vec<NewTrackPoint> = points
        .into_iter()
        .map(|p| NewTrackPoint::from_input(&id, p))
        .collect();

    let tracks = TrackPointsRepository::new(state.pool);
    match tracks.append(new_points).await {
        Ok(inserted) => (
            StatusCode::CREATED,
            Json(json!({ "inserted": inserted })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to append track points to voyage {id}: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to append track points",
            )
            .into_response()
        }
    }
}
