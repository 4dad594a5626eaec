//! Recording candidate value object

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::options::AudioCodec;

/// Highest track number representable in a file name
pub const MAX_TRACK_NUMBER: u32 = 999;

/// The file a new recording will be written to.
///
/// Audio is written to `temp_path` while recording and moved to
/// `final_path` once the encoder has been finalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingCandidate {
    pub recording_date: NaiveDate,
    pub track_number: u32,
    pub temp_path: PathBuf,
    pub final_path: PathBuf,
}

impl RecordingCandidate {
    /// Title written to the MP3 tag
    pub fn title(&self) -> String {
        format!("{} - Track {}", self.recording_date.format("%Y-%m-%d"), self.track_number)
    }
}

/// File name for a track: `2024-03-07 - 001.mp3`
pub fn track_file_name(date: NaiveDate, track_number: u32, codec: AudioCodec) -> String {
    format!(
        "{} - {:03}.{}",
        date.format("%Y-%m-%d"),
        track_number,
        codec.extension()
    )
}

/// Extract the track number from a file name produced by [`track_file_name`]
/// for the given date. Any extension is accepted so MP3 and WAV recordings
/// share one numbering sequence.
pub fn parse_track_number(file_name: &str, date: NaiveDate) -> Option<u32> {
    let prefix = format!("{} - ", date.format("%Y-%m-%d"));
    let rest = file_name.strip_prefix(&prefix)?;
    let (number, extension) = rest.split_once('.')?;
    if number.len() != 3 || extension.is_empty() {
        return None;
    }
    number.parse().ok()
}
