use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::error;

use crate::private_sales::{PrivateSale, PrivateSaleCreate};
use crate::private_sales_repo::PrivateSalesRepository;
use crate::web::AppState;

use super::json_error;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateSaleListQuery {
    pub voyage_id: Option<String>,
}

pub async fn list_private_sales(
    State(state): State<AppState>,
    Query(query): Query<PrivateSaleListQuery>,
) -> impl IntoResponse {
    let repo = PrivateSalesRepository::new(state.pool);

    match repo.list(query.voyage_id).await {
        Ok(sales) => Json(sales).into_response(),
        Err(e) => {
            error!("Failed to list private sales: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list private sales",
            )
            .into_response()
        }
    }
}

pub async fn create_private_sale(
    State(state): State<AppState>,
    Json(create): Json<PrivateSaleCreate>,
) -> impl IntoResponse {
    let repo = PrivateSalesRepository::new(state.pool);
    let sale = PrivateSale::from_create(create);

    match repo.create(sale).await {
        Ok(Some(sale)) => (StatusCode::CREATED, Json(sale)).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Voyage not found").into_response(),
        Err(e) => {
            error!("Failed to record private sale: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to record private sale",
            )
            .into_response()
        }
    }
}

pub async fn delete_private_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let repo = PrivateSalesRepository::new(state.pool);

    match repo.delete(&id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => json_error(StatusCode::NOT_FOUND, "Private sale not found").into_response(),
        Err(e) => {
            error!("Failed to delete private sale {id}: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to delete private sale",
            )
            .into_response()
        }
    }
}
