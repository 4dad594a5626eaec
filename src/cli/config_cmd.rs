//! Config command handler

use crate::application::ports::{AudioService, OptionsStore};
use crate::domain::error::{ConfigError, OptionsError};
use crate::domain::options::OptionKey;

use super::args::ConfigAction;
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: OptionsStore, A: AudioService>(
    action: ConfigAction,
    store: &S,
    audio: &A,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, audio, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: OptionsStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Options file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: OptionsStore, A: AudioService>(
    store: &S,
    audio: &A,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let key = parse_key(key)?;

    let mut options = store.load().await?;
    options.set_by_key(key, value)?;
    if key == OptionKey::RecordingDevice {
        check_recording_device(audio, options.recording_device())?;
    }
    store.save(&options).await?;

    let shown = options
        .get_by_key(key)
        .unwrap_or_else(|| "(default)".to_string());
    presenter.success(&format!("{} = {}", key, shown));
    Ok(())
}

async fn handle_get<S: OptionsStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    let key = parse_key(key)?;
    let options = store.load().await?;

    match options.get_by_key(key) {
        Some(v) => presenter.output(&v),
        None => presenter.output("(default)"),
    }
    Ok(())
}

async fn handle_list<S: OptionsStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let options = store.load().await?;
    presenter.option_list(&options);
    Ok(())
}

fn handle_path<S: OptionsStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

/// The device id must name an input the audio service can see
fn check_recording_device<A: AudioService>(
    audio: &A,
    device_id: usize,
) -> Result<(), ConfigError> {
    let devices = audio.recording_devices().map_err(|e| {
        ConfigError::Invalid(OptionsError::InvalidValue {
            key: OptionKey::RecordingDevice.to_string(),
            message: e.to_string(),
        })
    })?;

    if !devices.iter().any(|d| d.id == device_id) {
        return Err(OptionsError::UnknownRecordingDevice(device_id).into());
    }
    Ok(())
}

/// Parse a key, listing the valid ones on failure
fn parse_key(key: &str) -> Result<OptionKey, ConfigError> {
    key.parse::<OptionKey>().map_err(|_| {
        ConfigError::Invalid(OptionsError::InvalidValue {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", OptionKey::valid_keys()),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::MockAudio;
    use crate::infrastructure::TomlOptionsStore;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> TomlOptionsStore {
        TomlOptionsStore::with_path(dir.path().join("options.toml"))
    }

    #[test]
    fn parse_key_lists_valid_keys() {
        let err = parse_key("volume").unwrap_err().to_string();
        assert!(err.contains("volume"));
        assert!(err.contains("sample_rate"));
        assert_eq!(parse_key("genre").unwrap(), OptionKey::Genre);
    }

    #[tokio::test]
    async fn set_persists_valid_value() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        handle_set(&store, &MockAudio::default(), &Presenter::new(), "sample_rate", "48000")
            .await
            .unwrap();

        assert_eq!(store.load().await.unwrap().sample_rate(), 48000);
    }

    #[tokio::test]
    async fn set_rejects_invalid_value_without_writing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let audio = MockAudio::default();
        let result = handle_set(&store, &audio, &Presenter::new(), "channel_count", "6").await;

        assert!(matches!(
            result,
            Err(ConfigError::Invalid(OptionsError::UnsupportedChannelCount(6)))
        ));
        assert!(!store.exists());
    }

    #[tokio::test]
    async fn set_recording_device_must_exist() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let audio = MockAudio::default();
        let presenter = Presenter::new();

        let result = handle_set(&store, &audio, &presenter, "recording_device", "42").await;
        assert!(matches!(
            result,
            Err(ConfigError::Invalid(OptionsError::UnknownRecordingDevice(42)))
        ));
        assert!(!store.exists());

        handle_set(&store, &audio, &presenter, "recording_device", "1")
            .await
            .unwrap();
        assert_eq!(store.load().await.unwrap().recording_device(), 1);
    }

    #[tokio::test]
    async fn init_then_list() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let audio = MockAudio::default();

        handle_config_command(ConfigAction::Init, &store, &audio, &Presenter::new())
            .await
            .unwrap();
        assert!(store.exists());
        handle_config_command(ConfigAction::List, &store, &audio, &Presenter::new())
            .await
            .unwrap();
    }
}
