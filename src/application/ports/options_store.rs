//! Options storage port interface

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::error::ConfigError;
use crate::domain::options::Options;

/// Port for options storage
#[async_trait]
pub trait OptionsStore: Send + Sync {
    /// Load options from storage.
    ///
    /// # Returns
    /// The stored options, or defaults if nothing has been saved yet
    async fn load(&self) -> Result<Options, ConfigError>;

    /// Save options to storage.
    ///
    /// # Arguments
    /// * `options` - The options to save
    async fn save(&self, options: &Options) -> Result<(), ConfigError>;

    /// Get the options file path.
    fn path(&self) -> PathBuf;

    /// Check if the options file exists.
    fn exists(&self) -> bool;

    /// Initialize the options file with defaults.
    /// Fails if the file already exists.
    async fn init(&self) -> Result<(), ConfigError>;
}
