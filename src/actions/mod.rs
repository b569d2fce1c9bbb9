use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::json;

pub mod attachments;
pub mod auctions;
pub mod expenses;
pub mod memos;
pub mod private_sales;
pub mod registry;
pub mod statistics;
pub mod tracks;
pub mod voyages;

pub use attachments::*;
pub use auctions::*;
pub use expenses::*;
pub use memos::*;
pub use private_sales::*;
pub use registry::*;
pub use statistics::*;
pub use tracks::*;
pub use voyages::*;

/// Uniform JSON error body for every handler.
pub fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(json!({ "error": message })))
}
