//! Recording domain: session state, candidate files and folder layout

pub mod candidate;
pub mod folders;
pub mod session;
pub mod settings;

pub use candidate::{RecordingCandidate, MAX_TRACK_NUMBER};
pub use session::{InvalidStateTransition, RecordingSession, RecordingStatus};
pub use settings::RecordingSettings;
