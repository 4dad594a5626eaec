//! Domain error types

use std::path::PathBuf;

use thiserror::Error;

/// Error when an option value is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("Unsupported sample rate: {0} Hz. Supported: 8000, 11025, 16000, 22050, 32000, 44100, 48000")]
    UnsupportedSampleRate(u32),

    #[error("Unsupported channel count: {0}. Supported: 1 (mono), 2 (stereo)")]
    UnsupportedChannelCount(u16),

    #[error("Unsupported MP3 bit rate: {0} kbps")]
    UnsupportedBitRate(u32),

    #[error("Unsupported max recording time: {0} minutes. Supported: 0, 1, 2, 5, 15, 30, 45, 60, 120, 180")]
    UnsupportedMaxRecordingTime(u32),

    #[error("Unknown recording device: {0}")]
    UnknownRecordingDevice(usize),

    #[error("Destination is not a folder: {}", .0.display())]
    DestinationNotAFolder(PathBuf),

    #[error("Invalid codec: \"{0}\". Valid codecs are: mp3, wav")]
    InvalidCodec(String),

    #[error("Unknown option \"{0}\"")]
    UnknownKey(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error(transparent)]
    Invalid(#[from] OptionsError),

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

/// Error when a recording destination cannot be prepared
#[derive(Debug, Error)]
pub enum DestinationError {
    #[error("Failed to scan recording folder {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Too many recordings for {0}")]
    TrackLimitReached(String),
}
