//! Page models for the recording and settings pages
//!
//! Each page holds its own view state and exposes the operations its view
//! can invoke. Pages never talk to each other; the [`Shell`] owns both and
//! forwards navigation, audio events and shutdown notifications.
//!
//! [`Shell`]: super::shell::Shell

mod recording_page;
mod settings_page;

pub use recording_page::RecordingPage;
pub use settings_page::{RecordingsFolder, SettingsPage};

use thiserror::Error;

use crate::domain::error::{ConfigError, DestinationError, OptionsError};
use crate::domain::navigation::Page;
use crate::domain::recording::InvalidStateTransition;

use super::ports::AudioError;

/// Errors surfaced by page operations
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Destination(#[from] DestinationError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error("Failed to save options: {0}")]
    Config(#[from] ConfigError),

    #[error("Stop recording before changing settings")]
    RecordingInProgress,

    #[error("Not available on the {0} page")]
    WrongPage(Page),
}
