use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::vessel_memos;

/// A free-form investigation note attached to a vessel record.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = vessel_memos)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct VesselMemo {
    pub id: i32,
    pub vessel_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vessel_memos)]
pub struct NewVesselMemo {
    pub vessel_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewVesselMemo {
    pub fn new(vessel_id: i32, content: String) -> Self {
        let now = Utc::now();
        Self {
            vessel_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request body for creating or editing a memo.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoInput {
    pub content: String,
}
