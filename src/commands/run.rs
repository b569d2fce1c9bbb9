use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::db::DbPool;
use crate::track_archive::TrackArchive;
use crate::uploads::UploadStore;
use crate::web::{AppState, start_web_server};

pub async fn handle_run(
    interface: String,
    port: u16,
    archive_root: PathBuf,
    uploads_root: PathBuf,
    pool: DbPool,
) -> Result<()> {
    let uploads = UploadStore::new(uploads_root);
    uploads
        .ensure_dirs()
        .context("Failed to prepare uploads directories")?;

    let archive = TrackArchive::new(archive_root);
    info!("Track archive root: {}", archive.root().display());
    info!("Uploads root: {}", uploads.root().display());

    let state = AppState {
        pool,
        archive,
        uploads,
    };

    start_web_server(interface, port, state).await
}
