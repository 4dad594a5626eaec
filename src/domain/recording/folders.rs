//! Recording folder layout
//!
//! Recordings are stored as `<root>[/<identifier>]/<YYYY-MM>/<YYYY-MM-DD>/`,
//! where `<root>` is the configured destination folder or the default
//! "OnlyR Recordings" folder in the user's documents directory.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// Name of the default recordings folder
pub const DEFAULT_FOLDER_NAME: &str = "OnlyR Recordings";

/// Default root for recordings: `<documents>/OnlyR Recordings`.
/// Falls back to the home directory, then the temp directory.
pub fn default_destination_folder() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(DEFAULT_FOLDER_NAME)
}

/// Root folder, optionally scoped by a run identifier
pub fn root_destination_folder(identifier: Option<&str>, root: &Path) -> PathBuf {
    match identifier.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => root.join(id),
        None => root.to_path_buf(),
    }
}

/// Folder for all recordings made in the month of `date`
pub fn monthly_destination_folder(
    date: NaiveDate,
    identifier: Option<&str>,
    root: &Path,
) -> PathBuf {
    root_destination_folder(identifier, root).join(date.format("%Y-%m").to_string())
}

/// Folder for all recordings made on `date`
pub fn daily_destination_folder(
    date: NaiveDate,
    identifier: Option<&str>,
    root: &Path,
) -> PathBuf {
    monthly_destination_folder(date, identifier, root).join(date.format("%Y-%m-%d").to_string())
}
