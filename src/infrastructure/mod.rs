//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with cpal, the filesystem and the platform file manager.

pub mod config;
pub mod folder_opener;
pub mod logging;
pub mod recording;

// Re-export adapters
pub use config::TomlOptionsStore;
pub use folder_opener::SystemFolderOpener;
pub use recording::CpalAudioService;
