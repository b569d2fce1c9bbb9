use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use tracing::error;

use crate::uploads::UploadKind;
use crate::vessel_files::NewVesselFile;
use crate::vessel_files_repo::VesselFilesRepository;
use crate::vessel_photos::NewVesselPhoto;
use crate::vessel_photos_repo::VesselPhotosRepository;
use crate::web::AppState;

use super::json_error;

/// One file part pulled out of a multipart upload.
struct UploadPart {
    original_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Collect the `file` part plus any plain-text fields from a multipart
/// request. Field order is not significant.
async fn read_upload(
    multipart: &mut Multipart,
) -> Result<(Option<UploadPart>, Vec<(String, String)>), String> {
    let mut part: Option<UploadPart> = None;
    let mut fields = Vec::new();

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().unwrap_or_default().to_string();
                if name == "file" {
                    let original_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(|c| c.to_string());
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| format!("Failed to read upload: {e}"))?;
                    part = Some(UploadPart {
                        original_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                } else {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| format!("Failed to read field {name}: {e}"))?;
                    fields.push((name, value));
                }
            }
            Ok(None) => break,
            Err(e) => return Err(format!("Malformed multipart upload: {e}")),
        }
    }

    Ok((part, fields))
}

/// Content type for a stored row: what the client declared, or a guess
/// from the original filename when the client sent none.
fn resolve_mime(part: &UploadPart) -> Option<String> {
    part.content_type.clone().or_else(|| {
        mime_guess::from_path(&part.original_name)
            .first_raw()
            .map(str::to_string)
    })
}

pub async fn list_photos(
    State(state): State<AppState>,
    Path(vessel_id): Path<i32>,
) -> impl IntoResponse {
    let repo = VesselPhotosRepository::new(state.pool);
    match repo.for_vessel(vessel_id).await {
        Ok(photos) => Json(photos).into_response(),
        Err(e) => {
            error!("Failed to list photos for vessel {vessel_id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list photos").into_response()
        }
    }
}

/// Store an uploaded vessel photo. Only images are accepted; the first
/// photo a vessel receives becomes its primary automatically.
pub async fn upload_photo(
    State(state): State<AppState>,
    Path(vessel_id): Path<i32>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let part = match read_upload(&mut multipart).await {
        Ok((Some(part), _)) => part,
        Ok((None, _)) => {
            return json_error(StatusCode::BAD_REQUEST, "Missing file field").into_response();
        }
        Err(message) => {
            error!("{message}");
            return json_error(StatusCode::BAD_REQUEST, "Malformed multipart upload")
                .into_response();
        }
    };

    let mime_type = resolve_mime(&part);
    if !mime_type
        .as_deref()
        .is_some_and(|m| m.starts_with("image/"))
    {
        return json_error(StatusCode::BAD_REQUEST, "Photo upload must be an image")
            .into_response();
    }

    let repo = VesselPhotosRepository::new(state.pool);
    let is_first = match repo.for_vessel(vessel_id).await {
        Ok(existing) => existing.is_empty(),
        Err(e) => {
            error!("Failed to check photos for vessel {vessel_id}: {e}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store photo")
                .into_response();
        }
    };

    let stored = match state
        .uploads
        .save(UploadKind::Photo, &part.original_name, &part.bytes)
        .await
    {
        Ok(stored) => stored,
        Err(e) => {
            error!("Failed to store photo for vessel {vessel_id}: {e}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store photo")
                .into_response();
        }
    };

    let new_photo = NewVesselPhoto {
        vessel_id,
        filename: stored.filename.clone(),
        original_name: part.original_name,
        file_path: stored.file_path.clone(),
        file_size: Some(stored.size),
        mime_type,
        is_primary: is_first,
        created_at: Utc::now(),
    };

    match repo.create(new_photo).await {
        Ok(Some(photo)) => (StatusCode::CREATED, Json(photo)).into_response(),
        Ok(None) => {
            // The row never landed, so the stored bytes are orphans.
            state.uploads.remove(&stored.file_path).await;
            json_error(StatusCode::NOT_FOUND, "Vessel record not found").into_response()
        }
        Err(e) => {
            error!("Failed to record photo for vessel {vessel_id}: {e}");
            state.uploads.remove(&stored.file_path).await;
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store photo").into_response()
        }
    }
}

pub async fn set_primary_photo(
    State(state): State<AppState>,
    Path((vessel_id, photo_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let repo = VesselPhotosRepository::new(state.pool);
    match repo.set_primary(vessel_id, photo_id).await {
        Ok(Some(photo)) => Json(photo).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Photo not found").into_response(),
        Err(e) => {
            error!("Failed to set primary photo {photo_id} for vessel {vessel_id}: {e}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to set primary photo",
            )
            .into_response()
        }
    }
}

pub async fn delete_photo(
    State(state): State<AppState>,
    Path((vessel_id, photo_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let repo = VesselPhotosRepository::new(state.pool);
    match repo.delete(vessel_id, photo_id).await {
        Ok(Some(photo)) => {
            state.uploads.remove(&photo.file_path).await;
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Photo not found").into_response(),
        Err(e) => {
            error!("Failed to delete photo {photo_id} for vessel {vessel_id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete photo")
                .into_response()
        }
    }
}

pub async fn list_files(
    State(state): State<AppState>,
    Path(vessel_id): Path<i32>,
) -> impl IntoResponse {
    let repo = VesselFilesRepository::new(state.pool);
    match repo.for_vessel(vessel_id).await {
        Ok(files) => Json(files).into_response(),
        Err(e) => {
            error!("Failed to list files for vessel {vessel_id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list files").into_response()
        }
    }
}

/// Store an uploaded vessel document. Any file type is accepted; an
/// optional `description` field rides along into the row.
pub async fn upload_file(
    State(state): State<AppState>,
    Path(vessel_id): Path<i32>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let (part, fields) = match read_upload(&mut multipart).await {
        Ok((Some(part), fields)) => (part, fields),
        Ok((None, _)) => {
            return json_error(StatusCode::BAD_REQUEST, "Missing file field").into_response();
        }
        Err(message) => {
            error!("{message}");
            return json_error(StatusCode::BAD_REQUEST, "Malformed multipart upload")
                .into_response();
        }
    };

    let description = fields
        .into_iter()
        .find(|(name, _)| name == "description")
        .map(|(_, value)| value)
        .filter(|v| !v.is_empty());

    let mime_type = resolve_mime(&part);

    let stored = match state
        .uploads
        .save(UploadKind::File, &part.original_name, &part.bytes)
        .await
    {
        Ok(stored) => stored,
        Err(e) => {
            error!("Failed to store file for vessel {vessel_id}: {e}");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store file")
                .into_response();
        }
    };

    let new_file = NewVesselFile {
        vessel_id,
        filename: stored.filename.clone(),
        original_name: part.original_name,
        file_path: stored.file_path.clone(),
        file_size: Some(stored.size),
        mime_type,
        description,
        created_at: Utc::now(),
    };

    let repo = VesselFilesRepository::new(state.pool);
    match repo.create(new_file).await {
        Ok(Some(file)) => (StatusCode::CREATED, Json(file)).into_response(),
        Ok(None) => {
            state.uploads.remove(&stored.file_path).await;
            json_error(StatusCode::NOT_FOUND, "Vessel record not found").into_response()
        }
        Err(e) => {
            error!("Failed to record file for vessel {vessel_id}: {e}");
            state.uploads.remove(&stored.file_path).await;
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store file").into_response()
        }
    }
}

pub async fn delete_file(
    State(state): State<AppState>,
    Path((vessel_id, file_id)): Path<(i32, i32)>,
) -> impl IntoResponse {
    let repo = VesselFilesRepository::new(state.pool);
    match repo.delete(vessel_id, file_id).await {
        Ok(Some(file)) => {
            state.uploads.remove(&file.file_path).await;
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(None) => json_error(StatusCode::NOT_FOUND, "File not found").into_response(),
        Err(e) => {
            error!("Failed to delete file {file_id} for vessel {vessel_id}: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete file").into_response()
        }
    }
}
