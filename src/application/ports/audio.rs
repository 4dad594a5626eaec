//! Audio capture/encode port

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::recording::{RecordingCandidate, RecordingSettings};

/// Audio service errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Recording failed: {0}")]
    RecordingFailed(String),

    #[error("Failed to save recording: {0}")]
    SaveFailed(String),

    #[error("Recording already in progress")]
    AlreadyRecording,

    #[error("No recording in progress")]
    NotRecording,

    #[error("No audio device available")]
    NoAudioDevice,

    #[error("Failed to list audio devices: {0}")]
    DeviceQueryFailed(String),
}

/// An input device reported by the audio service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordingDeviceInfo {
    pub id: usize,
    pub name: String,
    pub is_default: bool,
}

/// Signals raised by the audio service while recording
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// Capture is running
    Started,
    /// Periodic progress: elapsed time and peak level (0.0..=1.0)
    Progress { elapsed_ms: u64, peak_level: f32 },
    /// The service wants the recording stopped (max recording time reached)
    StopRequested,
    /// Capture has ended and the file was saved, or saving failed
    Stopped(Result<PathBuf, AudioError>),
}

/// Channel the audio service publishes its events on
pub type AudioEventSender = mpsc::UnboundedSender<AudioEvent>;
pub type AudioEventReceiver = mpsc::UnboundedReceiver<AudioEvent>;

/// Port for audio capture and encoding.
///
/// Implementations publish [`AudioEvent`]s on a channel supplied at
/// construction. `start_recording` and `stop_recording` return as soon as the
/// request is accepted; completion is signalled by `Started`/`Stopped`.
#[async_trait]
pub trait AudioService: Send + Sync {
    /// List the available input devices
    fn recording_devices(&self) -> Result<Vec<RecordingDeviceInfo>, AudioError>;

    /// Begin capturing to `candidate.temp_path`
    async fn start_recording(
        &self,
        candidate: RecordingCandidate,
        settings: RecordingSettings,
    ) -> Result<(), AudioError>;

    /// Ask the capture to end, optionally fading the audio out first
    async fn stop_recording(&self, fade_out: bool) -> Result<(), AudioError>;
}
