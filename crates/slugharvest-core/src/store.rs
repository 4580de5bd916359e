use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::FetchedContent;
use crate::traits::ContentStore;

/// Filesystem-backed [`ContentStore`].
///
/// Layout: `{root}/{output_folder}/{extension}/{sanitized_name}`. Directory
/// creation tolerates directories created concurrently by other harvesters.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path `content` would be written to.
    pub fn path_for(&self, content: &FetchedContent, output_folder: &str) -> PathBuf {
        self.root
            .join(output_folder)
            .join(content.extension())
            .join(content.sanitized_name())
    }
}

impl Default for FsContentStore {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ContentStore for FsContentStore {
    async fn save(
        &self,
        content: &FetchedContent,
        output_folder: &str,
    ) -> Result<PathBuf, AppError> {
        let target = self.path_for(content, output_folder);
        if let Some(dir) = target.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| AppError::StorageError {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&target, &content.bytes)
            .await
            .map_err(|source| AppError::StorageError {
                path: target.clone(),
                source,
            })?;

        tracing::debug!(path = %target.display(), bytes = content.bytes.len(), "Content written");
        Ok(target)
    }
}
