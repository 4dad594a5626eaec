//! Platform file-manager adapter

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{FolderOpenError, FolderOpener};

/// Opens folders with `xdg-open`, `open` or `explorer`
pub struct SystemFolderOpener {
    launcher: String,
}

impl SystemFolderOpener {
    /// Use the launcher for the current platform
    pub fn new() -> Self {
        Self {
            launcher: Self::platform_launcher().to_string(),
        }
    }

    /// Create with a custom launcher command
    pub fn with_launcher(launcher: impl Into<String>) -> Self {
        Self {
            launcher: launcher.into(),
        }
    }

    pub fn launcher(&self) -> &str {
        &self.launcher
    }

    const fn platform_launcher() -> &'static str {
        if cfg!(target_os = "windows") {
            "explorer"
        } else if cfg!(target_os = "macos") {
            "open"
        } else {
            "xdg-open"
        }
    }
}

impl Default for SystemFolderOpener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FolderOpener for SystemFolderOpener {
    async fn open(&self, folder: &Path) -> Result<(), FolderOpenError> {
        let status = Command::new(&self.launcher)
            .arg(folder)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FolderOpenError::LauncherNotFound(self.launcher.clone())
                } else {
                    FolderOpenError::OpenFailed(e.to_string())
                }
            })?;

        // explorer.exe exits with 1 even on success
        if !status.success() && self.launcher != "explorer" {
            return Err(FolderOpenError::OpenFailed(format!(
                "{} exited with status: {}",
                self.launcher, status
            )));
        }

        Ok(())
    }
}
