use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::expenses;

/// One voyage expense (fuel, ice, crew, gear repair). Immutable once
/// recorded.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Serialize)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub voyage_id: String,
    pub expense_date: DateTime<Utc>,
    pub category: String,
    pub description: Option<String>,
    pub amount: f64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCreate {
    pub voyage_id: String,
    pub expense_date: DateTime<Utc>,
    pub category: String,
    pub description: Option<String>,
    pub amount: f64,
    pub note: Option<String>,
}

impl Expense {
    pub fn from_create(create: ExpenseCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            voyage_id: create.voyage_id,
            expense_date: create.expense_date,
            category: create.category,
            description: create.description,
            amount: create.amount,
            note: create.note,
            created_at: Utc::now(),
        }
    }
}
