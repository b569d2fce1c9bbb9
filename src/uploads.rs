use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// Which uploads subdirectory a stored file lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Photo,
    File,
}

impl UploadKind {
    pub fn subdir(&self) -> &'static str {
        match self {
            UploadKind::Photo => "photos",
            UploadKind::File => "files",
        }
    }
}

/// Metadata of a file written to the uploads root. `file_path` is
/// relative to the root, which is also how it is served back under
/// `/uploads`.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub filename: String,
    pub file_path: String,
    pub size: i64,
}

/// Plain save-to-disk storage for vessel photos and documents. Stored
/// names are generated, never taken from the client; the original name
/// only survives in the database row.
#[derive(Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the uploads root and its subdirectories.
    pub fn ensure_dirs(&self) -> Result<()> {
        for kind in [UploadKind::Photo, UploadKind::File] {
            let dir = self.root.join(kind.subdir());
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create uploads directory {}", dir.display()))?;
        }
        Ok(())
    }

    /// Write upload bytes under a generated name, keeping a sanitized
    /// version of the original extension so the static file service can
    /// guess a content type later.
    pub async fn save(
        &self,
        kind: UploadKind,
        original_name: &str,
        data: &[u8],
    ) -> Result<StoredUpload> {
        let filename = match sanitized_extension(original_name) {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        let relative = format!("{}/{filename}", kind.subdir());
        let path = self.root.join(&relative);

        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("Failed to store upload at {}", path.display()))?;

        Ok(StoredUpload {
            filename,
            file_path: relative,
            size: data.len() as i64,
        })
    }

    /// Best-effort removal of a stored file. A missing file is not an
    /// error: the database row is authoritative and is already gone.
    pub async fn remove(&self, file_path: &str) {
        let path = self.root.join(file_path);
        if let Err(e) = tokio::fs::remove_file(&path).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!("Failed to remove stored upload {}: {e}", path.display());
        }
    }
}

/// Lowercased alphanumeric extension of the client filename, if it has a
/// reasonable one. Anything else is dropped rather than stored.
fn sanitized_extension(original_name: &str) -> Option<String> {
    let ext = Path::new(original_name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
