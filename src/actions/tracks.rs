use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
};
use tracing::error;

use crate::web::AppState;

use super::json_error;

/// Archive scans are uncached directory walks, so they run on the
/// blocking pool like every other synchronous I/O in this service.
pub async fn list_tracks(
    State(state): State<AppState>,
    Path(mmsi): Path<String>,
) -> impl IntoResponse {
    let archive = state.archive.clone();
    match tokio::task::spawn_blocking(move || archive.entries_for(&mmsi)).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => {
            error!("Track archive scan failed: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to scan track archive",
            )
            .into_response()
        }
    }
}

pub async fn list_track_years(
    State(state): State<AppState>,
    Path(mmsi): Path<String>,
) -> impl IntoResponse {
    let archive = state.archive.clone();
    match tokio::task::spawn_blocking(move || archive.years_for(&mmsi)).await {
        Ok(years) => Json(years).into_response(),
        Err(e) => {
            error!("Track archive scan failed: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to scan track archive",
            )
            .into_response()
        }
    }
}

pub async fn list_track_months(
    State(state): State<AppState>,
    Path((mmsi, year)): Path<(String, i32)>,
) -> impl IntoResponse {
    let archive = state.archive.clone();
    match tokio::task::spawn_blocking(move || archive.months_for(&mmsi, year)).await {
        Ok(months) => Json(months).into_response(),
        Err(e) => {
            error!("Track archive scan failed: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to scan track archive",
            )
            .into_response()
        }
    }
}

pub async fn get_track_document(
    State(state): State<AppState>,
    Path((mmsi, filename)): Path<(String, String)>,
) -> impl IntoResponse {
    let archive = state.archive.clone();
    match tokio::task::spawn_blocking(move || archive.read_document(&mmsi, &filename)).await {
        Ok(Ok(Some(content))) => Html(content).into_response(),
        Ok(Ok(None)) => {
            json_error(StatusCode::NOT_FOUND, "Track document not found").into_response()
        }
        Ok(Err(e)) => {
            error!("Failed to read track document: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read track document",
            )
            .into_response()
        }
        Err(e) => {
            error!("Track archive read failed: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read track document",
            )
            .into_response()
        }
    }
}
