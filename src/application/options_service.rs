//! Options service: the single owner of the user's settings

use tracing::{debug, warn};

use crate::domain::error::{ConfigError, OptionsError};
use crate::domain::options::{OptionKey, Options};

use super::ports::OptionsStore;

/// Owns the current [`Options`] and the store they persist to.
///
/// Every mutation goes through [`update`](Self::update), which validates
/// against a copy and only commits on success. Changes are kept in memory
/// until [`save`](Self::save) is called at a flush point (leaving the settings
/// page, shutdown).
pub struct OptionsService<S: OptionsStore> {
    store: S,
    options: Options,
    dirty: bool,
}

impl<S: OptionsStore> OptionsService<S> {
    /// Create a service around already-loaded options
    pub fn new(store: S, options: Options) -> Self {
        Self {
            store,
            options,
            dirty: false,
        }
    }

    /// Load options from the store.
    ///
    /// An unreadable file is logged and replaced by defaults. Unsupported
    /// values are reset to their defaults and the options marked dirty so
    /// the corrected file is written at the next flush.
    pub async fn load(store: S) -> Self {
        let mut options = match store.load().await {
            Ok(options) => options,
            Err(e) => {
                warn!(
                    path = %store.path().display(),
                    error = %e,
                    "Could not read options, using defaults"
                );
                Options::default()
            }
        };

        let reset = options.sanitize();
        for key in &reset {
            warn!(option = %key, "Unsupported option value reset to default");
        }

        Self {
            store,
            options,
            dirty: !reset.is_empty(),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// True when there are changes not yet written to the store
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Apply a validated change. On error the current options are untouched.
    pub fn update<F>(&mut self, change: F) -> Result<(), OptionsError>
    where
        F: FnOnce(&mut Options) -> Result<(), OptionsError>,
    {
        let mut candidate = self.options.clone();
        change(&mut candidate)?;

        if candidate != self.options {
            self.options = candidate;
            self.dirty = true;
        }
        Ok(())
    }

    /// Set an option from its string form
    pub fn set_by_key(&mut self, key: OptionKey, value: &str) -> Result<(), OptionsError> {
        self.update(|options| options.set_by_key(key, value))
    }

    /// Persist pending changes.
    ///
    /// # Returns
    /// `true` if the store was written
    pub async fn save(&mut self) -> Result<bool, ConfigError> {
        if !self.dirty {
            debug!("Options unchanged, nothing to save");
            return Ok(false);
        }

        self.store.save(&self.options).await?;
        self.dirty = false;
        debug!(path = %self.store.path().display(), "Options saved");
        Ok(true)
    }
}
