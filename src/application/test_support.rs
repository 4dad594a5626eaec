//! Hand-written port mocks shared by the application tests

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::error::ConfigError;
use crate::domain::options::Options;
use crate::domain::recording::{RecordingCandidate, RecordingSettings};

use super::ports::{
    AudioError, AudioService, FolderOpenError, FolderOpener, OptionsStore, RecordingDeviceInfo,
};

/// In-memory store shared with the test through an `Arc`
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub saved: Arc<Mutex<Option<Options>>>,
    pub saves: Arc<Mutex<u32>>,
}

impl MemoryStore {
    pub fn with(options: Options) -> Self {
        Self {
            saved: Arc::new(Mutex::new(Some(options))),
            saves: Arc::default(),
        }
    }

    pub fn save_count(&self) -> u32 {
        *self.saves.lock().unwrap()
    }

    pub fn saved(&self) -> Option<Options> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl OptionsStore for MemoryStore {
    async fn load(&self) -> Result<Options, ConfigError> {
        Ok(self.saved.lock().unwrap().clone().unwrap_or_default())
    }

    async fn save(&self, options: &Options) -> Result<(), ConfigError> {
        *self.saved.lock().unwrap() = Some(options.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    fn path(&self) -> PathBuf {
        PathBuf::from("memory")
    }

    fn exists(&self) -> bool {
        self.saved.lock().unwrap().is_some()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        self.save(&Options::default()).await
    }
}

/// Store whose reads and writes always fail
pub struct BrokenStore;

#[async_trait]
impl OptionsStore for BrokenStore {
    async fn load(&self) -> Result<Options, ConfigError> {
        Err(ConfigError::ParseError("bad toml".to_string()))
    }

    async fn save(&self, _options: &Options) -> Result<(), ConfigError> {
        Err(ConfigError::WriteError("read-only".to_string()))
    }

    fn path(&self) -> PathBuf {
        PathBuf::from("broken")
    }

    fn exists(&self) -> bool {
        true
    }

    async fn init(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MockAudioState {
    pub recording: bool,
    pub started: Vec<(RecordingCandidate, RecordingSettings)>,
    pub stops: Vec<bool>,
    pub fail_start: bool,
    pub fail_stop: bool,
}

/// Audio service that only tracks calls. Events are fed to the shell by
/// the test itself.
#[derive(Clone, Default)]
pub struct MockAudio {
    pub state: Arc<Mutex<MockAudioState>>,
}

impl MockAudio {
    pub fn failing_start() -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().fail_start = true;
        mock
    }

    pub fn failing_stop() -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().fail_stop = true;
        mock
    }

    pub fn start_count(&self) -> usize {
        self.state.lock().unwrap().started.len()
    }

    pub fn stops(&self) -> Vec<bool> {
        self.state.lock().unwrap().stops.clone()
    }

    /// Simulate the capture ending on its own
    pub fn finish(&self) {
        self.state.lock().unwrap().recording = false;
    }
}

#[async_trait]
impl AudioService for MockAudio {
    fn recording_devices(&self) -> Result<Vec<RecordingDeviceInfo>, AudioError> {
        Ok(vec![
            RecordingDeviceInfo {
                id: 0,
                name: "Built-in Microphone".to_string(),
                is_default: true,
            },
            RecordingDeviceInfo {
                id: 1,
                name: "USB Interface".to_string(),
                is_default: false,
            },
        ])
    }

    async fn start_recording(
        &self,
        candidate: RecordingCandidate,
        settings: RecordingSettings,
    ) -> Result<(), AudioError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_start {
            return Err(AudioError::StartFailed("device busy".to_string()));
        }
        if state.recording {
            return Err(AudioError::AlreadyRecording);
        }
        state.recording = true;
        state.started.push((candidate, settings));
        Ok(())
    }

    async fn stop_recording(&self, fade_out: bool) -> Result<(), AudioError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_stop {
            return Err(AudioError::RecordingFailed("stream lost".to_string()));
        }
        if !state.recording {
            return Err(AudioError::NotRecording);
        }
        state.stops.push(fade_out);
        Ok(())
    }
}

/// Folder opener that remembers what it was asked to open
#[derive(Clone, Default)]
pub struct MockOpener {
    pub opened: Arc<Mutex<Vec<PathBuf>>>,
    pub fail: bool,
}

impl MockOpener {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl FolderOpener for MockOpener {
    async fn open(&self, folder: &Path) -> Result<(), FolderOpenError> {
        if self.fail {
            return Err(FolderOpenError::LauncherNotFound("xdg-open".to_string()));
        }
        self.opened.lock().unwrap().push(folder.to_path_buf());
        Ok(())
    }
}
