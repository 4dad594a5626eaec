//! Selection items offered by the settings page
//!
//! Each item pairs a display name with the value stored in [`Options`].
//! The tables here are also the source of truth for option validation.
//!
//! [`Options`]: super::Options

use std::fmt;

/// Sample rates (Hz) accepted for recording
pub const SUPPORTED_SAMPLE_RATES: &[u32] = &[8000, 11025, 16000, 22050, 32000, 44100, 48000];

/// Channel counts accepted for recording
pub const SUPPORTED_CHANNELS: &[u16] = &[1, 2];

/// MP3 bit rates (kbps) accepted by the encoder
pub const SUPPORTED_MP3_BIT_RATES: &[u32] =
    &[32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320];

/// Max recording times in minutes. Zero means no limit.
pub const SUPPORTED_MAX_RECORDING_MINUTES: &[u32] = &[0, 1, 2, 5, 15, 30, 45, 60, 120, 180];

/// An input device as shown on the settings page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingDeviceItem {
    pub device_id: usize,
    pub device_name: String,
    pub is_default: bool,
}

impl fmt::Display for RecordingDeviceItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default {
            write!(f, "{} (default)", self.device_name)
        } else {
            write!(f, "{}", self.device_name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRateItem {
    pub name: String,
    pub actual_sample_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelItem {
    pub name: String,
    pub channel_count: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitRateItem {
    pub name: String,
    pub actual_bit_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxRecordingTimeItem {
    pub name: String,
    pub actual_minutes: u32,
}

pub fn sample_rate_items() -> Vec<SampleRateItem> {
    SUPPORTED_SAMPLE_RATES
        .iter()
        .map(|&rate| SampleRateItem {
            name: format!("{} Hz", rate),
            actual_sample_rate: rate,
        })
        .collect()
}

pub fn channel_items() -> Vec<ChannelItem> {
    SUPPORTED_CHANNELS
        .iter()
        .map(|&count| ChannelItem {
            name: if count == 1 { "Mono" } else { "Stereo" }.to_string(),
            channel_count: count,
        })
        .collect()
}

pub fn bit_rate_items() -> Vec<BitRateItem> {
    SUPPORTED_MP3_BIT_RATES
        .iter()
        .map(|&rate| BitRateItem {
            name: format!("{} kbps", rate),
            actual_bit_rate: rate,
        })
        .collect()
}

pub fn max_recording_time_items() -> Vec<MaxRecordingTimeItem> {
    SUPPORTED_MAX_RECORDING_MINUTES
        .iter()
        .map(|&minutes| MaxRecordingTimeItem {
            name: max_recording_time_name(minutes),
            actual_minutes: minutes,
        })
        .collect()
}

/// Human-readable label for a max recording time
fn max_recording_time_name(minutes: u32) -> String {
    match minutes {
        0 => "No limit".to_string(),
        1 => "1 minute".to_string(),
        60 => "1 hour".to_string(),
        m if m % 60 == 0 => format!("{} hours", m / 60),
        m => format!("{} minutes", m),
    }
}
