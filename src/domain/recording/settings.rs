//! Capture and encoding parameters for one recording

use std::time::Duration;

use crate::domain::options::{AudioCodec, Options};

/// Snapshot of the options the audio service needs for a recording.
/// Taken at start so later settings edits don't affect a running capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSettings {
    pub device_id: usize,
    pub sample_rate: u32,
    pub channel_count: u16,
    pub mp3_bit_rate: u32,
    pub codec: AudioCodec,
    pub genre: String,
    pub max_recording_time: Option<Duration>,
}

impl From<&Options> for RecordingSettings {
    fn from(options: &Options) -> Self {
        let minutes = options.max_recording_time_mins();
        Self {
            device_id: options.recording_device(),
            sample_rate: options.sample_rate(),
            channel_count: options.channel_count(),
            mp3_bit_rate: options.mp3_bit_rate(),
            codec: options.codec(),
            genre: options.genre().to_string(),
            max_recording_time: (minutes > 0).then(|| Duration::from_secs(u64::from(minutes) * 60)),
        }
    }
}
