use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::vessel_registry;

/// One row of the vessel census: the canonical physical and
/// administrative description of a fishing vessel.
///
/// `group_name` packs a set of investigation-group labels into one
/// comma-joined text column. Membership questions must go through
/// [`VesselRecord::group_labels`] / [`parse_group_labels`] rather than
/// comparing the raw string.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = vessel_registry)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct VesselRecord {
    pub id: i32,
    pub vessel_name: String,
    pub tonnage: Option<f64>,
    pub length: Option<f64>,
    pub engine_type: Option<String>,
    pub engine_count: Option<i32>,
    pub engine_power_ps: Option<f64>,
    pub engine_power_kw: Option<f64>,
    pub engine_name: Option<String>,
    pub hull_material: Option<String>,
    pub registration_no: Option<String>,
    pub build_date: Option<String>,
    pub port: Option<String>,
    pub business_type: Option<String>,
    pub equipment_name: Option<String>,
    pub equipment_power: Option<String>,
    pub mmsi: Option<String>,
    pub license_local: Option<String>,
    pub license_start_local: Option<String>,
    pub license_end_local: Option<String>,
    pub license_province: Option<String>,
    pub license_start_province: Option<String>,
    pub license_end_province: Option<String>,
    pub group_name: Option<String>,
    pub fishing_hours: Option<f64>,
    pub organization: Option<String>,
    pub owner_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VesselRecord {
    /// The parsed set of group labels this vessel belongs to.
    pub fn group_labels(&self) -> Vec<String> {
        parse_group_labels(self.group_name.as_deref())
    }
}

/// Split a comma-packed group column into trimmed, non-empty labels.
/// Labels themselves must not contain the `", "` delimiter; that is the
/// standing constraint of the denormalized representation.
pub fn parse_group_labels(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) => s
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

/// A census row prepared for insertion. Identity is assigned by the
/// store on insert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vessel_registry)]
pub struct NewVesselRecord {
    pub vessel_name: String,
    pub tonnage: Option<f64>,
    pub length: Option<f64>,
    pub engine_type: Option<String>,
    pub engine_count: Option<i32>,
    pub engine_power_ps: Option<f64>,
    pub engine_power_kw: Option<f64>,
    pub engine_name: Option<String>,
    pub hull_material: Option<String>,
    pub registration_no: Option<String>,
    pub build_date: Option<String>,
    pub port: Option<String>,
    pub business_type: Option<String>,
    pub equipment_name: Option<String>,
    pub equipment_power: Option<String>,
    pub mmsi: Option<String>,
    pub license_local: Option<String>,
    pub license_start_local: Option<String>,
    pub license_end_local: Option<String>,
    pub license_province: Option<String>,
    pub license_start_province: Option<String>,
    pub license_end_province: Option<String>,
    pub group_name: Option<String>,
    pub fishing_hours: Option<f64>,
    pub organization: Option<String>,
    pub owner_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a vessel record. Fields left as `None` are not
/// touched; `updated_at` is stamped by the repository on every update.
#[derive(Debug, Clone, Default, Deserialize, AsChangeset)]
#[diesel(table_name = vessel_registry)]
#[serde(rename_all = "camelCase")]
pub struct VesselRecordUpdate {
    pub vessel_name: Option<String>,
    pub tonnage: Option<f64>,
    pub length: Option<f64>,
    pub engine_type: Option<String>,
    pub engine_count: Option<i32>,
    pub engine_power_ps: Option<f64>,
    pub engine_power_kw: Option<f64>,
    pub engine_name: Option<String>,
    pub hull_material: Option<String>,
    pub port: Option<String>,
    pub business_type: Option<String>,
    pub mmsi: Option<String>,
    pub license_local: Option<String>,
    pub license_start_local: Option<String>,
    pub license_end_local: Option<String>,
    pub group_name: Option<String>,
    pub fishing_hours: Option<f64>,
    pub organization: Option<String>,
    pub owner_name: Option<String>,
}

impl VesselRecordUpdate {
    /// An update with no fields set is a client error, not a no-op.
    pub fn is_empty(&self) -> bool {
        self.vessel_name.is_none()
            && self.tonnage.is_none()
            && self.length.is_none()
            && self.engine_type.is_none()
            && self.engine_count.is_none()
            && self.engine_power_ps.is_none()
            && self.engine_power_kw.is_none()
            && self.engine_name.is_none()
            && self.hull_material.is_none()
            && self.port.is_none()
            && self.business_type.is_none()
            && self.mmsi.is_none()
            && self.license_local.is_none()
            && self.license_start_local.is_none()
            && self.license_end_local.is_none()
            && self.group_name.is_none()
            && self.fishing_hours.is_none()
            && self.organization.is_none()
            && self.owner_name.is_none()
    }
}

/// A vessel record joined with its attachment tallies, computed fresh at
/// read time rather than stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VesselRecordWithCounts {
    #[serde(flatten)]
    pub record: VesselRecord,
    pub photo_count: i64,
    pub file_count: i64,
}
