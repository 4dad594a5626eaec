//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod audio;
pub mod folder_opener;
pub mod options_store;

// Re-export common types
pub use audio::{
    AudioError, AudioEvent, AudioEventReceiver, AudioEventSender, AudioService,
    RecordingDeviceInfo,
};
pub use folder_opener::{FolderOpenError, FolderOpener};
pub use options_store::OptionsStore;
