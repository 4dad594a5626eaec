//! Folder opener port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Folder opener errors
#[derive(Debug, Clone, Error)]
pub enum FolderOpenError {
    #[error("{0} not found")]
    LauncherNotFound(String),

    #[error("Failed to open folder: {0}")]
    OpenFailed(String),
}

/// Port for showing a folder in the platform file manager
#[async_trait]
pub trait FolderOpener: Send + Sync {
    async fn open(&self, folder: &Path) -> Result<(), FolderOpenError>;
}
