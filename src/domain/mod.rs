//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod error;
pub mod navigation;
pub mod options;
pub mod recording;

// Re-export common types
pub use error::*;
pub use navigation::{NavigationRequest, NavigationState, Page, RecordingPageState};
pub use options::{AudioCodec, OptionKey, Options};
pub use recording::{RecordingCandidate, RecordingSession, RecordingSettings, RecordingStatus};
