//! On-disk storage for photos attached to location reports.
//!
//! Each photo is written once as `{dir}/{uuid}.{ext}` and referenced from the
//! database by its public URL, `{public_path}/{uuid}.{ext}`.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::UploadsConfig;

/// Image extensions kept from the uploaded name. Anything else is stored
/// without an extension so it is never served as markup.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes uploaded photos to a directory served under a public URL prefix.
#[derive(Debug, Clone)]
pub struct PhotoStorage {
    dir: PathBuf,
    public_path: String,
}

impl PhotoStorage {
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            public_path: config.public_path.trim_end_matches('/').to_string(),
        }
    }

    /// Creates the upload directory if it is missing.
    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).await?;
        info!("Photo storage directory: {}", self.dir.display());
        Ok(())
    }

    /// Stores a photo under a fresh UUID name and returns its public URL.
    ///
    /// The extension of `original_name` is kept only for known image
    /// types; otherwise the file has no extension.
    pub async fn store(
        &self,
        original_name: Option<&str>,
        data: &[u8],
    ) -> Result<String, StorageError> {
        let file_name = match original_name.and_then(extension_of) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        fs::create_dir_all(&self.dir).await?;
        let mut file = fs::File::create(self.dir.join(&file_name)).await?;
        file.write_all(data).await?;
        file.flush().await?;

        info!(file = %file_name, bytes = data.len(), "Photo stored");
        Ok(format!("{}/{}", self.public_path, file_name))
    }

    /// Deletes a photo previously returned by [`store`](Self::store).
    ///
    /// URLs outside the public prefix are ignored, as are files that are
    /// already gone.
    pub async fn remove(&self, public_url: &str) -> Result<(), StorageError> {
        let Some(file_name) = self.file_name_of(public_url) else {
            warn!(url = %public_url, "Refusing to remove photo outside upload prefix");
            return Ok(());
        };

        match fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => {
                info!(file = %file_name, "Photo removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(file = %file_name, "Photo already gone");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Maps a public URL back to a bare file name inside the upload directory.
    fn file_name_of<'a>(&self, public_url: &'a str) -> Option<&'a str> {
        let name = public_url
            .strip_prefix(self.public_path.as_str())?
            .strip_prefix('/')?;
        let is_plain = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        is_plain.then_some(name)
    }
}

/// Lowercased extension of an uploaded file name, if it is a known image type.
fn extension_of(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}
