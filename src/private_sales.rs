use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::private_sales;

/// A direct (off-market) sale recorded against a voyage. Same lifecycle
/// as an auction row: immutable once recorded.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Serialize)]
#[diesel(table_name = private_sales)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PrivateSale {
    pub id: String,
    pub voyage_id: String,
    pub sale_date: DateTime<Utc>,
    pub fish_species: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_price: f64,
    pub buyer: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateSaleCreate {
    pub voyage_id: String,
    pub sale_date: DateTime<Utc>,
    pub fish_species: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub buyer: Option<String>,
    pub note: Option<String>,
}

impl PrivateSale {
    pub fn from_create(create: PrivateSaleCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            voyage_id: create.voyage_id,
            sale_date: create.sale_date,
            fish_species: create.fish_species,
            quantity: create.quantity,
            unit_price: create.unit_price,
            total_price: create.quantity * create.unit_price,
            buyer: create.buyer,
            note: create.note,
            created_at: Utc::now(),
        }
    }
}
