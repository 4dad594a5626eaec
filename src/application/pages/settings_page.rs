//! Settings page model

use std::path::PathBuf;

use chrono::Local;
use tracing::{error, warn};

use crate::application::options_service::OptionsService;
use crate::application::ports::{AudioService, FolderOpenError, FolderOpener, OptionsStore};
use crate::application::recording_folders::RecordingDestination;
use crate::domain::error::OptionsError;
use crate::domain::navigation::{NavigationRequest, NavigationState, Page};
use crate::domain::options::items::{
    bit_rate_items, channel_items, max_recording_time_items, sample_rate_items,
};
use crate::domain::options::{
    BitRateItem, ChannelItem, MaxRecordingTimeItem, OptionKey, RecordingDeviceItem,
    SampleRateItem,
};

use super::PageError;

/// Result of "show recordings"
#[derive(Debug)]
pub struct RecordingsFolder {
    pub path: PathBuf,
    /// Set when the folder was resolved but could not be opened
    pub open_error: Option<FolderOpenError>,
}

/// Selection lists and validated setters for the settings page.
///
/// Lists are built once, when the page is created.
pub struct SettingsPage {
    recording_devices: Vec<RecordingDeviceItem>,
    sample_rates: Vec<SampleRateItem>,
    channels: Vec<ChannelItem>,
    bit_rates: Vec<BitRateItem>,
    max_recording_times: Vec<MaxRecordingTimeItem>,
}

impl SettingsPage {
    pub fn new<A: AudioService>(audio: &A) -> Self {
        let recording_devices = match audio.recording_devices() {
            Ok(devices) => devices
                .into_iter()
                .map(|d| RecordingDeviceItem {
                    device_id: d.id,
                    device_name: d.name,
                    is_default: d.is_default,
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, "Could not list recording devices");
                Vec::new()
            }
        };

        Self {
            recording_devices,
            sample_rates: sample_rate_items(),
            channels: channel_items(),
            bit_rates: bit_rate_items(),
            max_recording_times: max_recording_time_items(),
        }
    }

    pub fn recording_devices(&self) -> &[RecordingDeviceItem] {
        &self.recording_devices
    }

    pub fn sample_rates(&self) -> &[SampleRateItem] {
        &self.sample_rates
    }

    pub fn channels(&self) -> &[ChannelItem] {
        &self.channels
    }

    pub fn bit_rates(&self) -> &[BitRateItem] {
        &self.bit_rates
    }

    pub fn max_recording_times(&self) -> &[MaxRecordingTimeItem] {
        &self.max_recording_times
    }

    /// Called when the page becomes visible. The settings page takes no state.
    pub fn activated(&mut self, _state: NavigationState) {}

    pub fn set_recording_device<S: OptionsStore>(
        &self,
        options: &mut OptionsService<S>,
        device_id: usize,
    ) -> Result<(), PageError> {
        if !self.recording_devices.iter().any(|d| d.device_id == device_id) {
            return Err(OptionsError::UnknownRecordingDevice(device_id).into());
        }
        options.update(|o| {
            o.set_recording_device(device_id);
            Ok(())
        })?;
        Ok(())
    }

    /// Set any option from its string form. Device ids are checked
    /// against the enumerated device list.
    pub fn set_option<S: OptionsStore>(
        &self,
        options: &mut OptionsService<S>,
        key: OptionKey,
        value: &str,
    ) -> Result<(), PageError> {
        if key == OptionKey::RecordingDevice {
            let device_id = value.trim().parse().map_err(|_| OptionsError::InvalidValue {
                key: key.to_string(),
                message: format!("\"{}\" is not a device number", value.trim()),
            })?;
            return self.set_recording_device(options, device_id);
        }
        Ok(options.set_by_key(key, value)?)
    }

    /// Use `folder` as the root for new recordings
    pub fn select_destination_folder<S: OptionsStore>(
        &self,
        options: &mut OptionsService<S>,
        folder: PathBuf,
    ) -> Result<(), PageError> {
        Ok(options.update(|o| o.set_destination_folder(Some(folder)))?)
    }

    /// Resolve the most relevant recordings folder and open it
    pub async fn show_recordings<S: OptionsStore, F: FolderOpener>(
        &self,
        options: &OptionsService<S>,
        destination: &RecordingDestination,
        opener: &F,
    ) -> RecordingsFolder {
        let path = destination.folder_to_show(Local::now().date_naive(), options.options());
        let open_error = opener.open(&path).await.err();
        if let Some(ref e) = open_error {
            warn!(folder = %path.display(), error = %e, "Could not open recordings folder");
        }
        RecordingsFolder { path, open_error }
    }

    /// Save pending changes, then go back to the recording page
    pub async fn navigate_recording<S: OptionsStore>(
        &self,
        options: &mut OptionsService<S>,
    ) -> Result<NavigationRequest, PageError> {
        options.save().await?;
        Ok(NavigationRequest::to(Page::Recording))
    }

    /// Pre-shutdown notification: persist whatever is pending
    pub async fn before_shutdown<S: OptionsStore>(&self, options: &mut OptionsService<S>) {
        if let Err(e) = options.save().await {
            error!(error = %e, "Could not save options at shutdown");
        }
    }
}
