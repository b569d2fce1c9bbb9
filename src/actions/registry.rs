use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::census::ingest_census;
use crate::registry::VesselRecordUpdate;
use crate::registry_repo::{PageRequest, RegistryFilter, RegistryRepository};
use crate::web::AppState;

use super::json_error;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryListQuery {
    pub search: Option<String>,
    pub port: Option<String>,
    pub business_type: Option<String>,
    pub group_name: Option<String>,
    pub organization: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub async fn list_registry(
    State(state): State<AppState>,
    Query(query): Query<RegistryListQuery>,
) -> impl IntoResponse {
    let repo = RegistryRepository::new(state.pool);

    let filter = RegistryFilter {
        search: query.search,
        port: query.port,
        business_type: query.business_type,
        group_name: query.group_name,
        organization: query.organization,
    };
    let page = PageRequest::new(query.page, query.page_size);

    match repo.list(&filter, page).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            error!("Failed to list vessel registry: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list vessel registry",
            )
            .into_response()
        }
    }
}

pub async fn get_registry_record(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = RegistryRepository::new(state.pool);

    match repo.get(id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Vessel record not found").into_response(),
        Err(e) => {
            error!("Failed to get vessel record {id}: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to get vessel record",
            )
            .into_response()
        }
    }
}

pub async fn update_registry_record(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(update): Json<VesselRecordUpdate>,
) -> impl IntoResponse {
    if update.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "No fields to update").into_response();
    }

    let repo = RegistryRepository::new(state.pool);

    match repo.update(id, update).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Vessel record not found").into_response(),
        Err(e) => {
            error!("Failed to update vessel record {id}: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update vessel record",
            )
            .into_response()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStatus {
    pub count: i64,
    pub has_data: bool,
    pub message: String,
}

pub async fn registry_status(State(state): State<AppState>) -> impl IntoResponse {
    let repo = RegistryRepository::new(state.pool);

    match repo.count_all().await {
        Ok(count) => Json(RegistryStatus {
            count,
            has_data: count > 0,
            message: if count > 0 {
                format!("Registry holds {count} vessel records")
            } else {
                "Registry is empty".to_string()
            },
        })
        .into_response(),
        Err(e) => {
            error!("Failed to read registry status: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read registry status",
            )
            .into_response()
        }
    }
}

pub async fn port_facets(State(state): State<AppState>) -> impl IntoResponse {
    let repo = RegistryRepository::new(state.pool);
    match repo.port_facets().await {
        Ok(facets) => Json(facets).into_response(),
        Err(e) => {
            error!("Failed to list port facets: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list ports").into_response()
        }
    }
}

pub async fn business_type_facets(State(state): State<AppState>) -> impl IntoResponse {
    let repo = RegistryRepository::new(state.pool);
    match repo.business_type_facets().await {
        Ok(facets) => Json(facets).into_response(),
        Err(e) => {
            error!("Failed to list business type facets: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list business types",
            )
            .into_response()
        }
    }
}

pub async fn group_facets(State(state): State<AppState>) -> impl IntoResponse {
    let repo = RegistryRepository::new(state.pool);
    match repo.group_facets().await {
        Ok(facets) => Json(facets).into_response(),
        Err(e) => {
            error!("Failed to list group facets: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list groups").into_response()
        }
    }
}

pub async fn organization_facets(State(state): State<AppState>) -> impl IntoResponse {
    let repo = RegistryRepository::new(state.pool);
    match repo.organization_facets().await {
        Ok(facets) => Json(facets).into_response(),
        Err(e) => {
            error!("Failed to list organization facets: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list organizations",
            )
            .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub force: Option<bool>,
}

/// Accept a census CSV as a multipart upload and bulk-load it. The file
/// is spooled to a temporary path so the ingestor can stream it; the
/// spool file is removed whether or not the load succeeds.
pub async fn upload_census(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut upload: Option<(String, Vec<u8>)> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => upload = Some((filename, bytes.to_vec())),
                    Err(e) => {
                        error!("Failed to read census upload: {e}");
                        return json_error(StatusCode::BAD_REQUEST, "Failed to read upload")
                            .into_response();
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Malformed census upload: {e}");
                return json_error(StatusCode::BAD_REQUEST, "Malformed multipart upload")
                    .into_response();
            }
        }
    }

    let Some((filename, bytes)) = upload else {
        return json_error(StatusCode::BAD_REQUEST, "Missing file field").into_response();
    };
    if !filename.to_ascii_lowercase().ends_with(".csv") {
        return json_error(StatusCode::BAD_REQUEST, "Census upload must be a .csv file")
            .into_response();
    }

    let spool = std::env::temp_dir().join(format!("census-{}.csv", Uuid::new_v4()));
    if let Err(e) = tokio::fs::write(&spool, &bytes).await {
        error!("Failed to spool census upload: {e}");
        return json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to store uploaded file",
        )
        .into_response();
    }

    let repo = RegistryRepository::new(state.pool);
    let report = ingest_census(&repo, &spool, query.force.unwrap_or(false)).await;

    if let Err(e) = tokio::fs::remove_file(&spool).await {
        error!("Failed to remove census spool file: {e}");
    }

    match report {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            error!("Census ingestion failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Census ingestion failed")
                .into_response()
        }
    }
}
