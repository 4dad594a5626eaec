//! Devices command handler

use tokio::sync::mpsc;

use crate::application::ports::{AudioError, AudioService, RecordingDeviceInfo};
use crate::infrastructure::CpalAudioService;

use super::presenter::Presenter;

/// List the input devices of the default host
pub fn handle_devices_command(json: bool, presenter: &Presenter) -> Result<(), AudioError> {
    // No recording happens here, so nobody listens for events
    let (events, _) = mpsc::unbounded_channel();
    let audio = CpalAudioService::new(events);
    let devices = audio.recording_devices()?;

    if json {
        presenter.output(&devices_json(&devices)?);
    } else {
        presenter.device_list(&devices);
    }
    Ok(())
}

fn devices_json(devices: &[RecordingDeviceInfo]) -> Result<String, AudioError> {
    serde_json::to_string_pretty(devices).map_err(|e| AudioError::DeviceQueryFailed(e.to_string()))
}
