//! Recording page model

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, error, info, warn};

use crate::application::ports::{AudioError, AudioEvent, AudioService};
use crate::application::recording_folders::RecordingDestination;
use crate::domain::navigation::NavigationState;
use crate::domain::options::Options;
use crate::domain::recording::{
    RecordingCandidate, RecordingSession, RecordingSettings, RecordingStatus,
};

use super::PageError;

/// View state and commands of the recording page
pub struct RecordingPage {
    session: RecordingSession,
    destination: RecordingDestination,
    show_splash: bool,
    current: Option<RecordingCandidate>,
    elapsed_ms: u64,
    peak_level: f32,
    last_saved: Option<PathBuf>,
    last_error: Option<String>,
}

impl RecordingPage {
    pub fn new(destination: RecordingDestination) -> Self {
        Self {
            session: RecordingSession::new(),
            destination,
            show_splash: false,
            current: None,
            elapsed_ms: 0,
            peak_level: 0.0,
            last_saved: None,
            last_error: None,
        }
    }

    pub fn status(&self) -> RecordingStatus {
        self.session.status()
    }

    pub fn is_recording_or_stopping(&self) -> bool {
        self.session.is_recording_or_stopping()
    }

    /// File being recorded, if any
    pub fn current_recording(&self) -> Option<&RecordingCandidate> {
        self.current.as_ref()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn peak_level(&self) -> f32 {
        self.peak_level
    }

    pub fn last_saved(&self) -> Option<&Path> {
        self.last_saved.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn destination(&self) -> &RecordingDestination {
        &self.destination
    }

    /// Consume the splash request made by the last navigation
    pub fn take_splash(&mut self) -> bool {
        std::mem::take(&mut self.show_splash)
    }

    /// Called when the page becomes visible
    pub async fn activated<A: AudioService>(
        &mut self,
        state: NavigationState,
        audio: &A,
        options: &Options,
    ) -> Result<(), PageError> {
        if let NavigationState::Recording(state) = state {
            self.show_splash = state.show_splash;
            if state.start_recording && !self.is_recording_or_stopping() {
                self.start_recording(audio, options).await?;
            }
        }
        Ok(())
    }

    /// Allocate the next file and start the audio service
    pub async fn start_recording<A: AudioService>(
        &mut self,
        audio: &A,
        options: &Options,
    ) -> Result<RecordingCandidate, PageError> {
        self.session.start()?;

        let today = Local::now().date_naive();
        let candidate = match self.destination.next_candidate(today, options) {
            Ok(candidate) => candidate,
            Err(e) => {
                self.session.abort();
                self.last_error = Some(e.to_string());
                return Err(e.into());
            }
        };

        if let Err(e) = audio
            .start_recording(candidate.clone(), RecordingSettings::from(options))
            .await
        {
            self.session.abort();
            self.last_error = Some(e.to_string());
            error!(error = %e, "Could not start recording");
            return Err(e.into());
        }

        info!(file = %candidate.final_path.display(), "Recording started");
        self.current = Some(candidate.clone());
        self.elapsed_ms = 0;
        self.peak_level = 0.0;
        self.last_error = None;
        Ok(candidate)
    }

    /// Ask the audio service to stop. Completion arrives as `Stopped`.
    pub async fn stop_recording<A: AudioService>(
        &mut self,
        audio: &A,
        fade_out: bool,
    ) -> Result<(), PageError> {
        self.session.request_stop()?;

        match audio.stop_recording(fade_out).await {
            Ok(()) => {
                debug!(fade_out, "Stop requested");
                Ok(())
            }
            Err(AudioError::NotRecording) => {
                // The service already finished on its own
                warn!("Stop requested but the audio service was idle");
                self.finish();
                Ok(())
            }
            Err(e) => {
                // No Stopped event follows a failed stop
                error!(error = %e, "Could not stop recording");
                self.last_error = Some(e.to_string());
                self.finish();
                Err(e.into())
            }
        }
    }

    /// Start when idle, stop when recording
    pub async fn toggle_recording<A: AudioService>(
        &mut self,
        audio: &A,
        options: &Options,
    ) -> Result<(), PageError> {
        match self.status() {
            RecordingStatus::NotRecording => self.start_recording(audio, options).await.map(|_| ()),
            RecordingStatus::Recording => self.stop_recording(audio, options.fade_out()).await,
            RecordingStatus::StopRequested => {
                debug!("Toggle ignored while stopping");
                Ok(())
            }
        }
    }

    /// React to a signal from the audio service
    pub async fn handle_audio_event<A: AudioService>(
        &mut self,
        event: AudioEvent,
        audio: &A,
        options: &Options,
    ) -> Result<(), PageError> {
        match event {
            AudioEvent::Started => debug!("Audio service started"),
            AudioEvent::Progress {
                elapsed_ms,
                peak_level,
            } => {
                self.elapsed_ms = elapsed_ms;
                self.peak_level = peak_level;
            }
            AudioEvent::StopRequested => {
                if self.session.is_recording() {
                    info!("Max recording time reached, stopping");
                    self.stop_recording(audio, options.fade_out()).await?;
                }
            }
            AudioEvent::Stopped(result) => {
                match result {
                    Ok(path) => {
                        info!(file = %path.display(), "Recording saved");
                        self.last_saved = Some(path);
                    }
                    Err(e) => {
                        error!(error = %e, "Recording ended with an error");
                        self.last_error = Some(e.to_string());
                    }
                }
                self.finish();
            }
        }
        Ok(())
    }

    /// Veto a close while audio is still being captured or saved
    pub fn closing(&self) -> bool {
        self.is_recording_or_stopping()
    }

    fn finish(&mut self) {
        if let Err(e) = self.session.stopped() {
            debug!(error = %e, "Stop reported while idle");
        }
        self.current = None;
        self.peak_level = 0.0;
    }
}
