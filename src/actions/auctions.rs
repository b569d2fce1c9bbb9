use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::error;

use crate::auctions::{Auction, AuctionCreate};
use crate::auctions_repo::AuctionsRepository;
use crate::web::AppState;

use super::json_error;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionListQuery {
    pub voyage_id: Option<String>,
}

pub async fn list_auctions(
    State(state): State<AppState>,
    Query(query): Query<AuctionListQuery>,
) -> impl IntoResponse {
    let repo = AuctionsRepository::new(state.pool);

    match repo.list(query.voyage_id).await {
        Ok(auctions) => Json(auctions).into_response(),
        Err(e) => {
            error!("Failed to list auctions: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list auctions")
                .into_response()
        }
    }
}

pub async fn create_auction(
    State(state): State<AppState>,
    Json(create): Json<AuctionCreate>,
) -> impl IntoResponse {
    let repo = AuctionsRepository::new(state.pool);
    let auction = Auction::from_create(create);

    match repo.create(auction).await {
        Ok(Some(auction)) => (StatusCode::CREATED, Json(auction)).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Voyage not found").into_response(),
        Err(e) => {
            error!("Failed to record auction: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to record auction")
                .into_response()
        }
    }
}

pub async fn delete_auction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let repo = AuctionsRepository::new(state.pool);

    match repo.delete(&id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => json_error(StatusCode::NOT_FOUND, "Auction not found").into_response(),
        Err(e) => {
            error!("Failed to delete auction {id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete auction")
                .into_response()
        }
    }
}
