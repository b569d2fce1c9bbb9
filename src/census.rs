use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{info, warn};

use crate::registry::NewVesselRecord;
use crate::registry_repo::RegistryRepository;

/// Rows are inserted in chunks of this size so a full census load does not
/// hold one row-sized transaction per record.
const INSERT_CHUNK_SIZE: usize = 500;

/// Convert a raw census cell to a float.
///
/// Absent cells, the `-` sentinel, and anything that fails to parse after
/// stripping thousands separators all become `None`. Ingestion must never
/// abort on a single bad cell, so this conversion cannot fail.
pub fn to_opt_f64(raw: Option<&str>) -> Option<f64> {
    let t = raw?.trim();
    if t.is_empty() || t == "-" {
        return None;
    }
    t.replace(',', "").parse::<f64>().ok()
}

/// Convert a raw census cell to an integer via the float path, so inputs
/// like `"3.0"` still land as `3`.
pub fn to_opt_i32(raw: Option<&str>) -> Option<i32> {
    to_opt_f64(raw).map(|v| v as i32)
}

/// Convert a raw census cell to text. The `-` sentinel becomes `None`;
/// everything else is trimmed. An explicitly blank cell stays an empty
/// string rather than collapsing to `None`.
pub fn to_opt_text(raw: Option<&str>) -> Option<String> {
    let v = raw?;
    if v == "-" {
        return None;
    }
    Some(v.trim().to_string())
}

/// One row of the national vessel census file, keyed by the exact Korean
/// header names. Unknown columns are ignored; a renamed header simply
/// leaves its field empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCensusRow {
    #[serde(rename = "선명")]
    pub vessel_name: Option<String>,
    #[serde(rename = "톤수")]
    pub tonnage: Option<String>,
    #[serde(rename = "길이")]
    pub length: Option<String>,
    #[serde(rename = "엔진종류")]
    pub engine_type: Option<String>,
    #[serde(rename = "엔진갯수")]
    pub engine_count: Option<String>,
    #[serde(rename = "엔진출력PS")]
    pub engine_power_ps: Option<String>,
    #[serde(rename = "엔진출력KW")]
    pub engine_power_kw: Option<String>,
    #[serde(rename = "선질")]
    pub hull_material: Option<String>,
    #[serde(rename = "등록번호")]
    pub registration_no: Option<String>,
    #[serde(rename = "건조일시")]
    pub build_date: Option<String>,
    #[serde(rename = "선적지")]
    pub port: Option<String>,
    #[serde(rename = "업종")]
    pub business_type: Option<String>,
    #[serde(rename = "장비명")]
    pub equipment_name: Option<String>,
    #[serde(rename = "출력")]
    pub equipment_power: Option<String>,
    #[serde(rename = "MMSI")]
    pub mmsi: Option<String>,
    #[serde(rename = "어업인허가(시군구)")]
    pub license_local: Option<String>,
    #[serde(rename = "허가시작일(시군구)")]
    pub license_start_local: Option<String>,
    #[serde(rename = "허가종료일(시군구)")]
    pub license_end_local: Option<String>,
    #[serde(rename = "어업인허가(시도)")]
    pub license_province: Option<String>,
    #[serde(rename = "허가시작일(시도)")]
    pub license_start_province: Option<String>,
    #[serde(rename = "허가종료일(시도)")]
    pub license_end_province: Option<String>,
}

impl RawCensusRow {
    /// Normalize every cell into a typed record. Returns `None` when the
    /// row has no usable vessel name, which is the one field the registry
    /// cannot store a row without.
    pub fn normalize(self) -> Option<NewVesselRecord> {
        let vessel_name = to_opt_text(self.vessel_name.as_deref())
            .filter(|name| !name.is_empty())?;
        let now = Utc::now();

        Some(NewVesselRecord {
            vessel_name,
            tonnage: to_opt_f64(self.tonnage.as_deref()),
            length: to_opt_f64(self.length.as_deref()),
            engine_type: to_opt_text(self.engine_type.as_deref()),
            engine_count: to_opt_i32(self.engine_count.as_deref()),
            engine_power_ps: to_opt_f64(self.engine_power_ps.as_deref()),
            engine_power_kw: to_opt_f64(self.engine_power_kw.as_deref()),
            engine_name: None,
            hull_material: to_opt_text(self.hull_material.as_deref()),
            registration_no: to_opt_text(self.registration_no.as_deref()),
            build_date: to_opt_text(self.build_date.as_deref()),
            port: to_opt_text(self.port.as_deref()),
            business_type: to_opt_text(self.business_type.as_deref()),
            equipment_name: to_opt_text(self.equipment_name.as_deref()),
            equipment_power: to_opt_text(self.equipment_power.as_deref()),
            mmsi: to_opt_text(self.mmsi.as_deref()),
            license_local: to_opt_text(self.license_local.as_deref()),
            license_start_local: to_opt_text(self.license_start_local.as_deref()),
            license_end_local: to_opt_text(self.license_end_local.as_deref()),
            license_province: to_opt_text(self.license_province.as_deref()),
            license_start_province: to_opt_text(self.license_start_province.as_deref()),
            license_end_province: to_opt_text(self.license_end_province.as_deref()),
            group_name: None,
            fishing_hours: None,
            organization: None,
            owner_name: None,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Open the census file for streaming, discarding a UTF-8 byte-order
/// marker if one is present. The government export tool emits one.
fn open_census_file(path: &Path) -> Result<csv::Reader<BufReader<File>>> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open census file {}", path.display()))?;

    let mut bom = [0u8; 3];
    let read = file.read(&mut bom).context("Failed to read census file")?;
    if !(read == 3 && bom == [0xEF, 0xBB, 0xBF]) {
        file.seek(SeekFrom::Start(0))
            .context("Failed to rewind census file")?;
    }

    Ok(csv::Reader::from_reader(BufReader::new(file)))
}

/// Outcome of a census load, reported back to the caller verbatim.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub success: bool,
    pub message: String,
    pub inserted_count: i64,
}

/// Bulk-load a census file into the registry.
///
/// With records already present and `force` unset this is a no-op that
/// reports the existing count, so re-posting the same file cannot
/// duplicate the registry. `force` replaces the whole snapshot: the store
/// holds exactly one census at a time, never a merge of two.
///
/// Rows are streamed; a row that fails to normalize or insert is logged
/// and skipped, and the load carries on. Only an unreadable source is an
/// error.
pub async fn ingest_census(
    repo: &RegistryRepository,
    path: &Path,
    force: bool,
) -> Result<IngestReport> {
    let existing = repo.count_all().await?;
    if existing > 0 && !force {
        return Ok(IngestReport {
            success: true,
            message: format!("Registry already holds {existing} vessel records"),
            inserted_count: existing,
        });
    }

    let mut reader = open_census_file(path)?;

    if force && existing > 0 {
        let deleted = repo.delete_all().await?;
        info!("Removed {deleted} existing vessel records before reload");
    }

    let mut seen: u64 = 0;
    let mut inserted: u64 = 0;
    let mut chunk: Vec<NewVesselRecord> = Vec::with_capacity(INSERT_CHUNK_SIZE);

    for record in reader.deserialize::<RawCensusRow>() {
        seen += 1;
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping unreadable census row {seen}: {e}");
                continue;
            }
        };
        let Some(new_record) = row.normalize() else {
            warn!("Skipping census row {seen}: no vessel name");
            continue;
        };
        chunk.push(new_record);

        if chunk.len() >= INSERT_CHUNK_SIZE {
            inserted += repo.insert_census_rows(std::mem::take(&mut chunk)).await? as u64;
        }
    }
    if !chunk.is_empty() {
        inserted += repo.insert_census_rows(chunk).await? as u64;
    }

    info!("Census load complete: {inserted} of {seen} rows inserted");
    Ok(IngestReport {
        success: true,
        message: format!("Loaded {inserted} of {seen} vessel records"),
        inserted_count: inserted as i64,
    })
}
