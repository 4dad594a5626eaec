//! Recording session state machine

use std::fmt;
use thiserror::Error;

/// Recording states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordingStatus {
    #[default]
    NotRecording,
    Recording,
    StopRequested,
}

impl RecordingStatus {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotRecording => "not recording",
            Self::Recording => "recording",
            Self::StopRequested => "stopping",
        }
    }
}

impl fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: RecordingStatus,
    pub action: String,
}

/// Recording session entity.
///
/// State machine:
///   NOT_RECORDING -> RECORDING (start)
///   RECORDING -> STOP_REQUESTED (request_stop)
///   RECORDING | STOP_REQUESTED -> NOT_RECORDING (stopped)
///   RECORDING -> NOT_RECORDING (abort, start failed)
#[derive(Debug, Default)]
pub struct RecordingSession {
    status: RecordingStatus,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    pub fn is_recording(&self) -> bool {
        self.status == RecordingStatus::Recording
    }

    /// True while recording or waiting for a requested stop to finish
    pub fn is_recording_or_stopping(&self) -> bool {
        self.status != RecordingStatus::NotRecording
    }

    /// Transition from NOT_RECORDING to RECORDING
    pub fn start(&mut self) -> Result<(), InvalidStateTransition> {
        if self.status != RecordingStatus::NotRecording {
            return Err(InvalidStateTransition {
                current_state: self.status,
                action: "start recording".to_string(),
            });
        }
        self.status = RecordingStatus::Recording;
        Ok(())
    }

    /// Transition from RECORDING to STOP_REQUESTED
    pub fn request_stop(&mut self) -> Result<(), InvalidStateTransition> {
        if self.status != RecordingStatus::Recording {
            return Err(InvalidStateTransition {
                current_state: self.status,
                action: "stop recording".to_string(),
            });
        }
        self.status = RecordingStatus::StopRequested;
        Ok(())
    }

    /// The audio service reported that recording has ended.
    /// Also accepted from RECORDING, since the service may stop on its own
    /// (device lost, encoder failure).
    pub fn stopped(&mut self) -> Result<(), InvalidStateTransition> {
        if self.status == RecordingStatus::NotRecording {
            return Err(InvalidStateTransition {
                current_state: self.status,
                action: "complete stop".to_string(),
            });
        }
        self.status = RecordingStatus::NotRecording;
        Ok(())
    }

    /// Roll back a start that the audio service refused
    pub fn abort(&mut self) {
        self.status = RecordingStatus::NotRecording;
    }
}
