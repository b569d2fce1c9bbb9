use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::error;

use crate::memos::{MemoInput, NewVesselMemo};
use crate::memos_repo::MemosRepository;
use crate::registry_repo::RegistryRepository;
use crate::web::AppState;

use super::json_error;

pub async fn list_memos(
    State(state): State<AppState>,
    Path(vessel_id): Path<i32>,
) -> impl IntoResponse {
    let registry = RegistryRepository::new(state.pool.clone());
    match registry.exists(vessel_id).await {
        Ok(true) => {}
        Ok(false) => {
            return json_error(StatusCode::NOT_FOUND, "Vessel record not found").into_response();
        }
        Err(e) => {
            error!("Failed to check vessel {vessel_id}: {e}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list memos")
                .into_response();
        }
    }

    let repo = MemosRepository::new(state.pool);
    match repo.for_vessel(vessel_id).await {
        Ok(memos) => Json(memos).into_response(),
        Err(e) => {
            error!("Failed to list memos for vessel {vessel_id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list memos").into_response()
        }
    }
}

pub async fn create_memo(
    State(state): State<AppState>,
    Path(vessel_id): Path<i32>,
    Json(input): Json<MemoInput>,
) -> impl IntoResponse {
    if input.content.trim().is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "Memo content must not be empty")
            .into_response();
    }

    let repo = MemosRepository::new(state.pool);
    match repo
        .create(NewVesselMemo::new(vessel_id, input.content))
        .await
    {
        Ok(Some(memo)) => (StatusCode::CREATED, Json(memo)).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Vessel record not found").into_response(),
        Err(e) => {
            error!("Failed to create memo for vessel {vessel_id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create memo").into_response()
        }
    }
}

pub async fn update_memo(
    State(state): State<AppState>,
    Path((vessel_id, memo_id)): Path<(i32, i32)>,
    Json(input): Json<MemoInput>,
) -> impl IntoResponse {
    if input.content.trim().is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "Memo content must not be empty")
            .into_response();
    }

    let repo = MemosRepository::new(state.pool);
    match repo.update(vessel_id, memo_id, input.content).await {
        Ok(Some(memo)) => Json(memo).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Memo not found").into_response(),
        Err(e) => {
            error!("Failed to update memo {memo_id} for vessel {vessel_id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update memo").into_response()
        }
    }
}

pub async fn delete_memo(
    State(state): State<AppState>,
    Path((vessel_id, memo_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let repo = MemosRepository::new(state.pool);
    match repo.delete(vessel_id, memo_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => json_error(StatusCode::NOT_FOUND, "Memo not found").into_response(),
        Err(e) => {
            error!("Failed to delete memo {memo_id} for vessel {vessel_id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete memo").into_response()
        }
    }
}
