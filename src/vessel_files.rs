use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::vessel_files;

/// A document attached to a vessel record (inspection reports, licenses,
/// damage claims). Stored on disk under the uploads root; the row holds
/// the stored name and the original client metadata.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = vessel_files)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct VesselFile {
    pub id: i32,
    pub vessel_id: i32,
    pub filename: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vessel_files)]
pub struct NewVesselFile {
    pub vessel_id: i32,
    pub filename: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
