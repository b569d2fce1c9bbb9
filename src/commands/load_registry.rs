use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::census::ingest_census;
use crate::db::DbPool;
use crate::registry_repo::RegistryRepository;

/// One-shot census load from the command line; the same code path the
/// upload endpoint uses.
pub async fn handle_load_registry(file: PathBuf, force: bool, pool: DbPool) -> Result<()> {
    let repo = RegistryRepository::new(pool);
    let report = ingest_census(&repo, &file, force).await?;
    info!("{}", report.message);
    Ok(())
}
