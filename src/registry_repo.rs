use anyhow::Result;
use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::db::DbPool;
use crate::registry::{
    NewVesselRecord, VesselRecord, VesselRecordUpdate, VesselRecordWithCounts, parse_group_labels,
};
use crate::schema::{vessel_files, vessel_memos, vessel_photos, vessel_registry};

/// Optional predicates for a registry listing, combined as a conjunction.
/// Empty strings are treated the same as absent predicates.
#[derive(Debug, Clone, Default)]
pub struct RegistryFilter {
    pub search: Option<String>,
    pub port: Option<String>,
    pub business_type: Option<String>,
    pub group_name: Option<String>,
    pub organization: Option<String>,
}

/// 1-based page selection with a bounded page size.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    pub const MAX_PAGE_SIZE: u32 = 100;

    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size
                .unwrap_or(Self::DEFAULT_PAGE_SIZE)
                .clamp(1, Self::MAX_PAGE_SIZE),
        }
    }

    fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.page_size as i64
    }
}

/// One page of filtered registry results. `total` and `total_pages` are
/// computed from the filtered set, not the whole table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryPage {
    pub data: Vec<VesselRecordWithCounts>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: i64,
}

/// A distinct value of a registry column with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub value: String,
    pub count: i64,
}

type BoxedRegistryQuery<'a> = vessel_registry::BoxedQuery<'a, diesel::sqlite::Sqlite>;

/// Translate the filter into one parameterized query. Each predicate is a
/// typed expression on the boxed query; the query text is never edited.
fn filtered_query<'a>(filter: &RegistryFilter) -> BoxedRegistryQuery<'a> {
    use crate::schema::vessel_registry::dsl::*;

    let mut query = vessel_registry.into_boxed();

    if let Some(term) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{term}%");
        query = query.filter(
            vessel_name
                .like(pattern.clone())
                .nullable()
                .or(mmsi.like(pattern.clone()))
                .or(registration_no.like(pattern)),
        );
    }
    if let Some(term) = filter.port.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(port.like(format!("%{term}%")));
    }
    if let Some(term) = filter.business_type.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(business_type.like(format!("%{term}%")));
    }
    if let Some(org) = filter.organization.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(organization.eq(org.to_string()));
    }
    if let Some(label) = filter.group_name.as_deref().filter(|s| !s.is_empty()) {
        // Exact-token membership in the comma-packed set: the label alone,
        // leading, trailing, or interior. Holds as long as labels never
        // contain the ", " delimiter.
        query = query.filter(
            group_name
                .eq(label.to_string())
                .or(group_name.like(format!("{label}, %")))
                .or(group_name.like(format!("%, {label}")))
                .or(group_name.like(format!("%, {label}, %"))),
        );
    }

    query
}

fn attach_counts(
    conn: &mut SqliteConnection,
    records: Vec<VesselRecord>,
) -> Result<Vec<VesselRecordWithCounts>, diesel::result::Error> {
    let ids: Vec<i32> = records.iter().map(|r| r.id).collect();

    let photo_counts: HashMap<i32, i64> = vessel_photos::table
        .filter(vessel_photos::vessel_id.eq_any(&ids))
        .group_by(vessel_photos::vessel_id)
        .select((vessel_photos::vessel_id, count_star()))
        .load::<(i32, i64)>(conn)?
        .into_iter()
        .collect();

    let file_counts: HashMap<i32, i64> = vessel_files::table
        .filter(vessel_files::vessel_id.eq_any(&ids))
        .group_by(vessel_files::vessel_id)
        .select((vessel_files::vessel_id, count_star()))
        .load::<(i32, i64)>(conn)?
        .into_iter()
        .collect();

    Ok(records
        .into_iter()
        .map(|record| {
            let photo_count = photo_counts.get(&record.id).copied().unwrap_or(0);
            let file_count = file_counts.get(&record.id).copied().unwrap_or(0);
            VesselRecordWithCounts {
                record,
                photo_count,
                file_count,
            }
        })
        .collect())
}

#[derive(Clone)]
pub struct RegistryRepository {
    pool: DbPool,
}

impl RegistryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a chunk of census rows. A uniqueness conflict on
    /// `registration_no` means the row is already present and is skipped
    /// by the constraint itself; any other per-row failure is logged and
    /// skipped. Returns how many rows actually landed.
    pub async fn insert_census_rows(&self, rows: Vec<NewVesselRecord>) -> Result<usize> {
        let pool = self.pool.clone();

        let inserted = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let mut inserted = 0usize;
            for row in rows {
                let result = diesel::insert_into(vessel_registry::table)
                    .values(&row)
                    .on_conflict(vessel_registry::registration_no)
                    .do_nothing()
                    .execute(&mut conn);

                match result {
                    Ok(0) => warn!(
                        "Skipping census row for {}: registration number {:?} already present",
                        row.vessel_name, row.registration_no
                    ),
                    Ok(n) => inserted += n,
                    Err(e) => warn!("Failed to insert census row for {}: {e}", row.vessel_name),
                }
            }

            Ok::<usize, anyhow::Error>(inserted)
        })
        .await??;

        Ok(inserted)
    }

    /// Remove every vessel record along with its memos and attachment
    /// rows. Used by the force-replace ingestion path; the store holds a
    /// single census snapshot at a time.
    pub async fn delete_all(&self) -> Result<usize> {
        let pool = self.pool.clone();

        let deleted = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let deleted = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
                diesel::delete(vessel_memos::table).execute(conn)?;
                diesel::delete(vessel_photos::table).execute(conn)?;
                diesel::delete(vessel_files::table).execute(conn)?;
                diesel::delete(vessel_registry::table).execute(conn)
            })?;

            Ok::<usize, anyhow::Error>(deleted)
        })
        .await??;

        Ok(deleted)
    }

    pub async fn count_all(&self) -> Result<i64> {
        let pool = self.pool.clone();

        let count = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let count = vessel_registry::table.count().get_result::<i64>(&mut conn)?;

            Ok::<i64, anyhow::Error>(count)
        })
        .await??;

        Ok(count)
    }

    pub async fn exists(&self, record_id: i32) -> Result<bool> {
        let pool = self.pool.clone();

        let count = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let count = vessel_registry::table
                .find(record_id)
                .count()
                .get_result::<i64>(&mut conn)?;

            Ok::<i64, anyhow::Error>(count)
        })
        .await??;

        Ok(count > 0)
    }

    /// Get one vessel record with fresh attachment counts.
    pub async fn get(&self, record_id: i32) -> Result<Option<VesselRecordWithCounts>> {
        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let record: Option<VesselRecord> = vessel_registry::table
                .find(record_id)
                .first::<VesselRecord>(&mut conn)
                .optional()?;

            let Some(record) = record else {
                return Ok::<Option<VesselRecordWithCounts>, anyhow::Error>(None);
            };

            let photo_count: i64 = vessel_photos::table
                .filter(vessel_photos::vessel_id.eq(record_id))
                .count()
                .get_result(&mut conn)?;
            let file_count: i64 = vessel_files::table
                .filter(vessel_files::vessel_id.eq(record_id))
                .count()
                .get_result(&mut conn)?;

            Ok(Some(VesselRecordWithCounts {
                record,
                photo_count,
                file_count,
            }))
        })
        .await??;

        Ok(result)
    }

    /// Apply a partial update and stamp `updated_at`. Returns the updated
    /// record, or `None` when the id is unknown. Callers reject empty
    /// field sets before getting here.
    pub async fn update(
        &self,
        record_id: i32,
        fields: VesselRecordUpdate,
    ) -> Result<Option<VesselRecord>> {
        let pool = self.pool.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows = diesel::update(vessel_registry::table.find(record_id))
                .set((&fields, vessel_registry::updated_at.eq(Utc::now())))
                .execute(&mut conn)?;

            if rows == 0 {
                return Ok::<Option<VesselRecord>, anyhow::Error>(None);
            }

            let record = vessel_registry::table
                .find(record_id)
                .first::<VesselRecord>(&mut conn)?;

            Ok(Some(record))
        })
        .await??;

        Ok(result)
    }

    /// Run the composed filter and return one page plus the filtered
    /// total. Ordering is always by id ascending so pagination is stable.
    pub async fn list(&self, filter: &RegistryFilter, page: PageRequest) -> Result<RegistryPage> {
        let pool = self.pool.clone();
        let filter = filter.clone();

        let result = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let total: i64 = filtered_query(&filter).count().get_result(&mut conn)?;

            let records: Vec<VesselRecord> = filtered_query(&filter)
                .order(vessel_registry::id.asc())
                .limit(page.page_size as i64)
                .offset(page.offset())
                .load::<VesselRecord>(&mut conn)?;

            let data = attach_counts(&mut conn, records)?;

            let page_size = page.page_size as i64;
            let total_pages = (total + page_size - 1) / page_size;

            Ok::<RegistryPage, anyhow::Error>(RegistryPage {
                data,
                total,
                page: page.page,
                page_size: page.page_size,
                total_pages,
            })
        })
        .await??;

        Ok(result)
    }

    /// Distinct home ports with occurrence counts, most common first.
    pub async fn port_facets(&self) -> Result<Vec<FacetCount>> {
        let pool = self.pool.clone();

        let facets = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows: Vec<(Option<String>, i64)> = vessel_registry::table
                .filter(vessel_registry::port.is_not_null())
                .group_by(vessel_registry::port)
                .select((vessel_registry::port, count_star()))
                .load(&mut conn)?;

            Ok::<Vec<FacetCount>, anyhow::Error>(sort_by_count(rows))
        })
        .await??;

        Ok(facets)
    }

    /// Distinct business types with occurrence counts, most common first.
    pub async fn business_type_facets(&self) -> Result<Vec<FacetCount>> {
        let pool = self.pool.clone();

        let facets = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows: Vec<(Option<String>, i64)> = vessel_registry::table
                .filter(vessel_registry::business_type.is_not_null())
                .group_by(vessel_registry::business_type)
                .select((vessel_registry::business_type, count_star()))
                .load(&mut conn)?;

            Ok::<Vec<FacetCount>, anyhow::Error>(sort_by_count(rows))
        })
        .await??;

        Ok(facets)
    }

    /// Distinct organizations with occurrence counts, most common first.
    pub async fn organization_facets(&self) -> Result<Vec<FacetCount>> {
        let pool = self.pool.clone();

        let facets = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let rows: Vec<(Option<String>, i64)> = vessel_registry::table
                .filter(vessel_registry::organization.is_not_null())
                .group_by(vessel_registry::organization)
                .select((vessel_registry::organization, count_star()))
                .load(&mut conn)?;

            Ok::<Vec<FacetCount>, anyhow::Error>(sort_by_count(rows))
        })
        .await??;

        Ok(facets)
    }

    /// Group labels with member counts, label ascending. Every record's
    /// comma-packed set is split first, so one record contributes to each
    /// of its labels.
    pub async fn group_facets(&self) -> Result<Vec<FacetCount>> {
        let pool = self.pool.clone();

        let facets = tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;

            let packed: Vec<Option<String>> = vessel_registry::table
                .filter(vessel_registry::group_name.is_not_null())
                .select(vessel_registry::group_name)
                .load(&mut conn)?;

            let mut counts: BTreeMap<String, i64> = BTreeMap::new();
            for raw in packed {
                for label in parse_group_labels(raw.as_deref()) {
                    *counts.entry(label).or_insert(0) += 1;
                }
            }

            Ok::<Vec<FacetCount>, anyhow::Error>(
                counts
                    .into_iter()
                    .map(|(value, count)| FacetCount { value, count })
                    .collect(),
            )
        })
        .await??;

        Ok(facets)
    }
}

fn sort_by_count(rows: Vec<(Option<String>, i64)>) -> Vec<FacetCount> {
    let mut facets: Vec<FacetCount> = rows
        .into_iter()
        .filter_map(|(value, count)| value.map(|value| FacetCount { value, count }))
        .collect();
    facets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    facets
}
