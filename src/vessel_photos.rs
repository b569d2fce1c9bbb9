use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::vessel_photos;

/// A photo attached to a vessel record. The image itself lives on disk
/// under the uploads root; this row records the stored name and the
/// original client metadata. At most one photo per vessel is primary.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = vessel_photos)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct VesselPhoto {
    pub id: i32,
    pub vessel_id: i32,
    pub filename: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vessel_photos)]
pub struct NewVesselPhoto {
    pub vessel_id: i32,
    pub filename: String,
    pub original_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}
