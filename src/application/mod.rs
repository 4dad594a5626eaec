//! Application layer - Use cases and port interfaces
//!
//! Contains the page models, the shell coordinating them, and trait
//! definitions for external system interactions.

pub mod options_service;
pub mod pages;
pub mod ports;
pub mod recording_folders;
pub mod shell;

#[cfg(test)]
pub(crate) mod test_support;

pub use options_service::OptionsService;
pub use pages::{PageError, RecordingPage, RecordingsFolder, SettingsPage};
pub use recording_folders::{find_folder_to_show, RecordingDestination};
pub use shell::{CloseDecision, Shell, ShellSignal};
