use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::auctions;

/// One auction-market sale recorded against a voyage. Immutable once
/// recorded; corrections are delete-and-reenter.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Serialize)]
#[diesel(table_name = auctions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: String,
    pub voyage_id: String,
    pub auction_date: DateTime<Utc>,
    pub auction_port: String,
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
pub struct AuctionCreate {
    pub voyage_id: String,
    pub auction_date: DateTime<Utc>,
    pub auction_port: String,
    pub fish_species: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub buyer: Option<String>,
    pub note: Option<String>,
}

impl Auction {
    /// Total price is derived, never taken from the client.
    pub fn from_create(create: AuctionCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            voyage_id: create.voyage_id,
            auction_date: create.auction_date,
            auction_port: create.auction_port,
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
