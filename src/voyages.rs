use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::voyages;

/// Departure port recorded for ledger entries created before the real
/// port is known.
pub const UNKNOWN_PORT: &str = "미상";

/// Voyage lifecycle. The wire labels are the source-language ones the
/// investigation platform has always used; the set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoyageStatus {
    #[serde(rename = "조업중")]
    Fishing,
    #[serde(rename = "입항")]
    Returned,
    #[serde(rename = "완료")]
    Completed,
}

impl VoyageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VoyageStatus::Fishing => "조업중",
            VoyageStatus::Returned => "입항",
            VoyageStatus::Completed => "완료",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "조업중" => Some(VoyageStatus::Fishing),
            "입항" => Some(VoyageStatus::Returned),
            "완료" => Some(VoyageStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for VoyageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One fishing trip of a vessel, keyed by `<mmsi>-<year>-<month>`.
///
/// The third key segment is the calendar month (1-12). Earlier
/// iterations of the platform mixed month and a per-year voyage counter
/// in that position; every creation path here uses the month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Voyage {
    pub id: String,
    pub mmsi: String,
    pub year: i32,
    pub month: i32,
    pub vessel_name: String,
    pub departure_port: String,
    pub departure_date: DateTime<Utc>,
    pub arrival_port: Option<String>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub fishing_area: String,
    pub catch_amount: f64,
    pub fish_species: String,
    pub status: VoyageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Voyage {
    /// Composite ledger key. The month is zero-padded so keys sort in
    /// calendar order as plain text.
    pub fn voyage_key(mmsi: &str, year: i32, month: u32) -> String {
        format!("{mmsi}-{year}-{month:03}")
    }

    /// A fresh monthly ledger entry: placeholder departure port, departure
    /// pinned to the first instant of the month, fishing while open.
    /// Returns `None` for a month outside 1-12.
    pub fn monthly(mmsi: &str, year: i32, month: u32, vessel_name: &str) -> Option<Self> {
        let departure_date = NaiveDate::from_ymd_opt(year, month, 1)?
            .and_hms_opt(0, 0, 0)?
            .and_utc();
        let now = Utc::now();

        Some(Self {
            id: Self::voyage_key(mmsi, year, month),
            mmsi: mmsi.to_string(),
            year,
            month: month as i32,
            vessel_name: vessel_name.to_string(),
            departure_port: UNKNOWN_PORT.to_string(),
            departure_date,
            arrival_port: None,
            arrival_date: None,
            fishing_area: format!("{year}년 {month}월 조업"),
            catch_amount: 0.0,
            fish_species: String::new(),
            status: VoyageStatus::Fishing,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Database row for a voyage; status is stored as its wire label.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Identifiable)]
#[diesel(table_name = voyages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct VoyageModel {
    pub id: String,
    pub mmsi: String,
    pub year: i32,
    pub month: i32,
    pub vessel_name: String,
    pub departure_port: String,
    pub departure_date: DateTime<Utc>,
    pub arrival_port: Option<String>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub fishing_area: String,
    pub catch_amount: f64,
    pub fish_species: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Voyage> for VoyageModel {
    fn from(voyage: Voyage) -> Self {
        Self {
            id: voyage.id,
            mmsi: voyage.mmsi,
            year: voyage.year,
            month: voyage.month,
            vessel_name: voyage.vessel_name,
            departure_port: voyage.departure_port,
            departure_date: voyage.departure_date,
            arrival_port: voyage.arrival_port,
            arrival_date: voyage.arrival_date,
            fishing_area: voyage.fishing_area,
            catch_amount: voyage.catch_amount,
            fish_species: voyage.fish_species,
            status: voyage.status.label().to_string(),
            created_at: voyage.created_at,
            updated_at: voyage.updated_at,
        }
    }
}

impl From<VoyageModel> for Voyage {
    fn from(model: VoyageModel) -> Self {
        let status = VoyageStatus::from_label(&model.status).unwrap_or(VoyageStatus::Fishing);
        Self {
            id: model.id,
            mmsi: model.mmsi,
            year: model.year,
            month: model.month,
            vessel_name: model.vessel_name,
            departure_port: model.departure_port,
            departure_date: model.departure_date,
            arrival_port: model.arrival_port,
            arrival_date: model.arrival_date,
            fishing_area: model.fishing_area,
            catch_amount: model.catch_amount,
            fish_species: model.fish_species,
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Partial update for a voyage; `None` fields are untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoyageUpdate {
    pub arrival_port: Option<String>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub fishing_area: Option<String>,
    pub catch_amount: Option<f64>,
    pub fish_species: Option<String>,
    pub status: Option<VoyageStatus>,
}

impl VoyageUpdate {
    pub fn is_empty(&self) -> bool {
        self.arrival_port.is_none()
            && self.arrival_date.is_none()
            && self.fishing_area.is_none()
            && self.catch_amount.is_none()
            && self.fish_species.is_none()
            && self.status.is_none()
    }

    pub(crate) fn changeset(&self) -> VoyageChanges {
        VoyageChanges {
            arrival_port: self.arrival_port.clone(),
            arrival_date: self.arrival_date,
            fishing_area: self.fishing_area.clone(),
            catch_amount: self.catch_amount,
            fish_species: self.fish_species.clone(),
            status: self.status.map(|s| s.label().to_string()),
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = voyages)]
pub(crate) struct VoyageChanges {
    pub arrival_port: Option<String>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub fishing_area: Option<String>,
    pub catch_amount: Option<f64>,
    pub fish_species: Option<String>,
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voyage_key_zero_pads_the_month() {
        assert_eq!(Voyage::voyage_key("440004950", 2025, 3), "440004950-2025-003");
        assert_eq!(Voyage::voyage_key("440004950", 2025, 12), "440004950-2025-012");
    }

    #[test]
    fn monthly_voyage_starts_at_the_first_instant_of_the_month() {
        let voyage = Voyage::monthly("440004950", 2025, 3, "수복호").unwrap();
        assert_eq!(voyage.id, "440004950-2025-003");
        assert_eq!(
            voyage.departure_date.to_rfc3339(),
            "2025-03-01T00:00:00+00:00"
        );
        assert_eq!(voyage.status, VoyageStatus::Fishing);
        assert_eq!(voyage.departure_port, UNKNOWN_PORT);
        assert_eq!(voyage.fishing_area, "2025년 3월 조업");
    }

    #[test]
    fn monthly_voyage_rejects_out_of_range_months() {
        assert!(Voyage::monthly("440004950", 2025, 0, "수복호").is_none());
        assert!(Voyage::monthly("440004950", 2025, 13, "수복호").is_none());
    }

    #[test]
    fn status_labels_round_trip() {
        for status in [
            VoyageStatus::Fishing,
            VoyageStatus::Returned,
            VoyageStatus::Completed,
        ] {
            assert_eq!(VoyageStatus::from_label(status.label()), Some(status));
        }
        assert_eq!(VoyageStatus::from_label("정박"), None);
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(VoyageUpdate::default().is_empty());
        let update = VoyageUpdate {
            status: Some(VoyageStatus::Completed),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
