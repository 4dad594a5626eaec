//! Where recordings go, and which folder to show the user

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, error};

use crate::domain::error::DestinationError;
use crate::domain::options::Options;
use crate::domain::recording::candidate::{parse_track_number, track_file_name};
use crate::domain::recording::folders::{
    daily_destination_folder, default_destination_folder, monthly_destination_folder,
    root_destination_folder,
};
use crate::domain::recording::{RecordingCandidate, MAX_TRACK_NUMBER};

/// Pick a folder of recordings to show.
///
/// Tries today's folder, then this month's, then the (identifier-scoped)
/// root. With an identifier, the unscoped root is used next and created if
/// missing. Any filesystem error is logged and swallowed; if nothing
/// suitable exists, `fallback` is created and returned.
pub fn find_folder_to_show(
    today: NaiveDate,
    identifier: Option<&str>,
    root: &Path,
    fallback: &Path,
) -> PathBuf {
    let found = match find_existing_folder(today, identifier, root) {
        Ok(found) => found,
        Err(e) => {
            error!(root = %root.display(), error = %e, "Could not find destination folder");
            None
        }
    };

    if let Some(folder) = found.filter(|f| f.is_dir()) {
        return folder;
    }

    if let Err(e) = fs::create_dir_all(fallback) {
        error!(folder = %fallback.display(), error = %e, "Could not create default folder");
    }
    fallback.to_path_buf()
}

fn find_existing_folder(
    today: NaiveDate,
    identifier: Option<&str>,
    root: &Path,
) -> io::Result<Option<PathBuf>> {
    let daily = daily_destination_folder(today, identifier, root);
    if dir_exists(&daily)? {
        return Ok(Some(daily));
    }

    let monthly = monthly_destination_folder(today, identifier, root);
    if dir_exists(&monthly)? {
        return Ok(Some(monthly));
    }

    let scoped_root = root_destination_folder(identifier, root);
    if dir_exists(&scoped_root)? {
        return Ok(Some(scoped_root));
    }

    if identifier.is_some_and(|id| !id.trim().is_empty()) {
        let unscoped_root = root_destination_folder(None, root);
        if !dir_exists(&unscoped_root)? {
            fs::create_dir_all(&unscoped_root)?;
        }
        return Ok(Some(unscoped_root));
    }

    Ok(None)
}

/// Like `Path::is_dir`, but reports errors other than "not found"
fn dir_exists(path: &Path) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(metadata.is_dir()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Allocates files for new recordings and resolves folders to show.
#[derive(Debug, Clone)]
pub struct RecordingDestination {
    identifier: Option<String>,
    default_root: PathBuf,
    temp_folder: PathBuf,
}

impl RecordingDestination {
    /// Destination using the user's documents folder and the system temp dir
    pub fn new(identifier: Option<String>) -> Self {
        Self::with_folders(
            identifier,
            default_destination_folder(),
            std::env::temp_dir().join("OnlyR"),
        )
    }

    /// Destination with explicit default root and temp folder
    pub fn with_folders(
        identifier: Option<String>,
        default_root: impl Into<PathBuf>,
        temp_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            identifier: identifier.filter(|id| !id.trim().is_empty()),
            default_root: default_root.into(),
            temp_folder: temp_folder.into(),
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn default_root(&self) -> &Path {
        &self.default_root
    }

    /// Configured destination root, or the default
    pub fn root<'a>(&'a self, options: &'a Options) -> &'a Path {
        options.destination_folder().unwrap_or(&self.default_root)
    }

    /// Folder to open when the user asks to see their recordings
    pub fn folder_to_show(&self, today: NaiveDate, options: &Options) -> PathBuf {
        find_folder_to_show(
            today,
            self.identifier(),
            self.root(options),
            &self.default_root,
        )
    }

    /// File for the next recording made on `today`.
    /// Track numbers continue from the highest already in today's folder.
    pub fn next_candidate(
        &self,
        today: NaiveDate,
        options: &Options,
    ) -> Result<RecordingCandidate, DestinationError> {
        let folder = daily_destination_folder(today, self.identifier(), self.root(options));
        let track_number = next_track_number(&folder, today)?;
        let file_name = track_file_name(today, track_number, options.codec());

        debug!(folder = %folder.display(), track_number, "Allocated recording candidate");

        Ok(RecordingCandidate {
            recording_date: today,
            track_number,
            temp_path: self.temp_folder.join(&file_name),
            final_path: folder.join(file_name),
        })
    }
}

fn next_track_number(folder: &Path, date: NaiveDate) -> Result<u32, DestinationError> {
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(1),
        Err(source) => {
            return Err(DestinationError::Scan {
                path: folder.to_path_buf(),
                source,
            })
        }
    };

    let highest = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            entry
                .file_name()
                .to_str()
                .and_then(|name| parse_track_number(name, date))
        })
        .max()
        .unwrap_or(0);

    if highest >= MAX_TRACK_NUMBER {
        return Err(DestinationError::TrackLimitReached(
            date.format("%Y-%m-%d").to_string(),
        ));
    }
    Ok(highest + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::options::AudioCodec;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn returns_daily_folder_when_present() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("rec");
        let daily = daily_destination_folder(today(), None, &root);
        fs::create_dir_all(&daily).unwrap();
        let fallback = dir.path().join("fallback");

        assert_eq!(find_folder_to_show(today(), None, &root, &fallback), daily);
        assert!(!fallback.exists());
    }

    #[test]
    fn returns_monthly_folder_when_no_daily() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("rec");
        let monthly = monthly_destination_folder(today(), None, &root);
        fs::create_dir_all(&monthly).unwrap();

        let folder = find_folder_to_show(today(), None, &root, &dir.path().join("fallback"));
        assert_eq!(folder, monthly);
    }

    #[test]
    fn identifier_without_scoped_folder_creates_unscoped_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("rec");
        let fallback = dir.path().join("fallback");

        let folder = find_folder_to_show(today(), Some("studio"), &root, &fallback);
        assert_eq!(folder, root);
        assert!(root.is_dir());
        assert!(!root.join("studio").exists());
        assert!(!fallback.exists());
    }

    #[test]
    fn root_that_is_a_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("rec");
        fs::write(&root, b"not a folder").unwrap();
        let fallback = dir.path().join("fallback");

        let folder = find_folder_to_show(today(), Some("studio"), &root, &fallback);
        assert_eq!(folder, fallback);
        assert!(fallback.is_dir());
    }

    #[test]
    fn first_track_in_empty_folder() {
        let dir = TempDir::new().unwrap();
        let destination = RecordingDestination::with_folders(
            None,
            dir.path().join("rec"),
            dir.path().join("tmp"),
        );

        let candidate = destination.next_candidate(today(), &Options::default()).unwrap();
        assert_eq!(candidate.track_number, 1);
        assert_eq!(
            candidate.final_path,
            dir.path().join("rec/2024-03/2024-03-07/2024-03-07 - 001.mp3")
        );
        assert_eq!(candidate.temp_path, dir.path().join("tmp/2024-03-07 - 001.mp3"));
    }

    #[test]
    fn next_track_follows_highest_existing() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("rec");
        let daily = daily_destination_folder(today(), Some("hall"), &root);
        fs::create_dir_all(&daily).unwrap();
        fs::write(daily.join("2024-03-07 - 001.mp3"), b"").unwrap();
        fs::write(daily.join("2024-03-07 - 004.wav"), b"").unwrap();
        fs::write(daily.join("readme.txt"), b"").unwrap();

        let mut options = Options::default();
        options.set_destination_folder(Some(root.clone())).unwrap();
        options.set_codec(AudioCodec::Wav);

        let destination =
            RecordingDestination::with_folders(Some("hall".to_string()), dir.path(), dir.path());
        let candidate = destination.next_candidate(today(), &options).unwrap();

        assert_eq!(candidate.track_number, 5);
        assert_eq!(candidate.final_path, daily.join("2024-03-07 - 005.wav"));
    }

    #[test]
    fn track_limit_is_reported() {
        let dir = TempDir::new().unwrap();
        let daily = daily_destination_folder(today(), None, dir.path());
        fs::create_dir_all(&daily).unwrap();
        fs::write(daily.join("2024-03-07 - 999.mp3"), b"").unwrap();

        let mut options = Options::default();
        options
            .set_destination_folder(Some(dir.path().to_path_buf()))
            .unwrap();
        let destination = RecordingDestination::with_folders(None, dir.path(), dir.path());

        assert!(matches!(
            destination.next_candidate(today(), &options),
            Err(DestinationError::TrackLimitReached(_))
        ));
    }

    #[test]
    fn blank_identifier_is_dropped() {
        let destination = RecordingDestination::with_folders(Some(" ".to_string()), "/a", "/b");
        assert_eq!(destination.identifier(), None);
    }
}
