use axum::{extract::State, http::StatusCode, response::{IntoResponse, Json}};
use serde::Serialize;
use tracing::error;

use crate::auctions_repo::AuctionsRepository;
use crate::registry_repo::RegistryRepository;
use crate::voyages::VoyageStatus;
use crate::voyages_repo::VoyagesRepository;
use crate::web::AppState;

use super::json_error;

/// Platform-wide headline numbers for the dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_vessels: i64,
    pub total_voyages: i64,
    pub active_voyages: i64,
    pub total_catch: f64,
    pub total_auction_revenue: f64,
}

pub async fn get_statistics(State(state): State<AppState>) -> impl IntoResponse {
    let registry = RegistryRepository::new(state.pool.clone());
    let voyages = VoyagesRepository::new(state.pool.clone());
    let auctions = AuctionsRepository::new(state.pool);

    let stats = async {
        Ok::<Statistics, anyhow::Error>(Statistics {
            total_vessels: registry.count_all().await?,
            total_voyages: voyages.count_all().await?,
            active_voyages: voyages.count_with_status(VoyageStatus::Fishing).await?,
            total_catch: voyages.total_catch().await?,
            total_auction_revenue: auctions.total_revenue().await?,
        })
    }
    .await;

    match stats {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => {
            error!("Failed to compute statistics: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to compute statistics",
            )
            .into_response()
        }
    }
}
