use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::error;

use crate::expenses::{Expense, ExpenseCreate};
use crate::expenses_repo::ExpensesRepository;
use crate::web::AppState;

use super::json_error;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListQuery {
    pub voyage_id: Option<String>,
}

pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseListQuery>,
) -> impl IntoResponse {
    let repo = ExpensesRepository::new(state.pool);

    match repo.list(query.voyage_id).await {
        Ok(expenses) => Json(expenses).into_response(),
        Err(e) => {
            error!("Failed to list expenses: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list expenses")
                .into_response()
        }
    }
}

pub async fn create_expense(
    State(state): State<AppState>,
    Json(create): Json<ExpenseCreate>,
) -> impl IntoResponse {
    let repo = ExpensesRepository::new(state.pool);
    let expense = Expense::from_create(create);

    match repo.create(expense).await {
        Ok(Some(expense)) => (StatusCode::CREATED, Json(expense)).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Voyage not found").into_response(),
        Err(e) => {
            error!("Failed to record expense: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to record expense")
                .into_response()
        }
    }
}

pub async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let repo = ExpensesRepository::new(state.pool);

    match repo.delete(&id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => json_error(StatusCode::NOT_FOUND, "Expense not found").into_response(),
        Err(e) => {
            error!("Failed to delete expense {id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete expense")
                .into_response()
        }
    }
}
