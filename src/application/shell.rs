//! Shell: owns both pages and coordinates navigation and shutdown

use std::path::PathBuf;

use tracing::{debug, error, info};

use crate::domain::navigation::{NavigationRequest, NavigationState, Page, RecordingPageState};
use crate::domain::options::{OptionKey, Options};
use crate::domain::recording::RecordingStatus;

use super::options_service::OptionsService;
use super::pages::{PageError, RecordingPage, RecordingsFolder, SettingsPage};
use super::ports::{AudioEvent, AudioService, FolderOpener, OptionsStore};
use super::recording_folders::RecordingDestination;

/// Outcome of a close request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    /// Pre-shutdown notification sent; the application may exit
    Close,
    /// The active page refused to close
    Vetoed,
    /// Close postponed until the running recording has stopped
    Deferred,
}

/// What the event loop should do after handling an audio event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellSignal {
    Continue,
    Shutdown,
}

/// Application coordinator.
///
/// Holds the options service, the audio service and both pages. Pages are
/// addressed through [`Page`]; navigation swaps the current page and calls
/// its `activated` hook with the request's state.
pub struct Shell<A, S, F>
where
    A: AudioService,
    S: OptionsStore,
    F: FolderOpener,
{
    audio: A,
    opener: F,
    options: OptionsService<S>,
    recording_page: RecordingPage,
    settings_page: SettingsPage,
    current_page: Page,
    close_pending: bool,
}

impl<A, S, F> Shell<A, S, F>
where
    A: AudioService,
    S: OptionsStore,
    F: FolderOpener,
{
    /// Build both pages. Call [`start`](Self::start) to show the first page.
    pub fn new(
        audio: A,
        opener: F,
        options: OptionsService<S>,
        destination: RecordingDestination,
    ) -> Self {
        let settings_page = SettingsPage::new(&audio);
        Self {
            audio,
            opener,
            options,
            recording_page: RecordingPage::new(destination),
            settings_page,
            current_page: Page::Recording,
            close_pending: false,
        }
    }

    /// Show the recording page with the splash, starting a recording if the
    /// user asked for that on launch.
    pub async fn start(&mut self) -> Result<(), PageError> {
        let state = RecordingPageState {
            show_splash: true,
            start_recording: self.options.options().start_recording_on_launch(),
        };
        self.navigate(NavigationRequest::with_state(
            Page::Recording,
            NavigationState::Recording(state),
        ))
        .await
    }

    pub fn current_page(&self) -> Page {
        self.current_page
    }

    pub fn options(&self) -> &Options {
        self.options.options()
    }

    pub fn options_service(&self) -> &OptionsService<S> {
        &self.options
    }

    pub fn recording_page(&self) -> &RecordingPage {
        &self.recording_page
    }

    pub fn recording_page_mut(&mut self) -> &mut RecordingPage {
        &mut self.recording_page
    }

    pub fn settings_page(&self) -> &SettingsPage {
        &self.settings_page
    }

    /// True once a close has been deferred until recording stops
    pub fn is_close_pending(&self) -> bool {
        self.close_pending
    }

    /// Swap the visible page and activate it
    pub async fn navigate(&mut self, request: NavigationRequest) -> Result<(), PageError> {
        debug!(from = %self.current_page, to = %request.target, "Navigating");
        self.current_page = request.target;

        match request.target {
            Page::Recording => {
                self.recording_page
                    .activated(request.state, &self.audio, self.options.options())
                    .await
            }
            Page::Settings => {
                self.settings_page.activated(request.state);
                Ok(())
            }
        }
    }

    /// Recording page -> settings page. Refused while recording.
    pub async fn show_settings(&mut self) -> Result<(), PageError> {
        self.require_page(Page::Recording)?;
        if self.recording_page.is_recording_or_stopping() {
            return Err(PageError::RecordingInProgress);
        }
        self.navigate(NavigationRequest::to(Page::Settings)).await
    }

    /// Settings page -> recording page, saving the options first
    pub async fn leave_settings(&mut self) -> Result<(), PageError> {
        self.require_page(Page::Settings)?;
        let request = self.settings_page.navigate_recording(&mut self.options).await?;
        self.navigate(request).await
    }

    pub async fn start_recording(&mut self) -> Result<(), PageError> {
        self.require_page(Page::Recording)?;
        self.recording_page
            .start_recording(&self.audio, self.options.options())
            .await
            .map(|_| ())
    }

    pub async fn stop_recording(&mut self) -> Result<(), PageError> {
        self.require_page(Page::Recording)?;
        let fade_out = self.options.options().fade_out();
        self.recording_page.stop_recording(&self.audio, fade_out).await
    }

    pub async fn toggle_recording(&mut self) -> Result<(), PageError> {
        self.require_page(Page::Recording)?;
        self.recording_page
            .toggle_recording(&self.audio, self.options.options())
            .await
    }

    pub fn set_option(&mut self, key: OptionKey, value: &str) -> Result<(), PageError> {
        self.require_page(Page::Settings)?;
        self.settings_page.set_option(&mut self.options, key, value)
    }

    pub fn select_destination_folder(&mut self, folder: PathBuf) -> Result<(), PageError> {
        self.require_page(Page::Settings)?;
        self.settings_page
            .select_destination_folder(&mut self.options, folder)
    }

    pub async fn show_recordings(&self) -> Result<RecordingsFolder, PageError> {
        self.require_page(Page::Settings)?;
        Ok(self
            .settings_page
            .show_recordings(
                &self.options,
                self.recording_page.destination(),
                &self.opener,
            )
            .await)
    }

    /// Handle a request to close the application.
    ///
    /// With `allow_close_when_recording` set, a running recording is stopped
    /// and the close deferred until the audio service reports `Stopped`
    /// (see [`handle_audio_event`](Self::handle_audio_event)). Otherwise the
    /// active page may veto; if it doesn't, the pre-shutdown notification
    /// is broadcast. Repeating the request while a close is deferred asks
    /// for an immediate stop without fade.
    pub async fn request_close(&mut self) -> CloseDecision {
        if self.close_pending {
            // Asked again: end the capture now, cutting any fade short
            if let Err(e) = self.audio.stop_recording(false).await {
                debug!(error = %e, "Immediate stop ignored");
            }
            return CloseDecision::Deferred;
        }

        let options = self.options.options();
        if options.allow_close_when_recording() && self.recording_page.is_recording_or_stopping() {
            self.close_pending = true;

            if self.recording_page.status() == RecordingStatus::Recording {
                let fade_out = options.fade_out();
                if let Err(e) = self.recording_page.stop_recording(&self.audio, fade_out).await {
                    error!(error = %e, "Could not stop recording during close");
                    self.close_pending = false;
                    self.before_shutdown().await;
                    return CloseDecision::Close;
                }
            }

            info!("Close deferred until recording stops");
            return CloseDecision::Deferred;
        }

        let vetoed = match self.current_page {
            Page::Recording => self.recording_page.closing(),
            Page::Settings => false,
        };
        if vetoed {
            debug!("Close vetoed by the {} page", self.current_page);
            return CloseDecision::Vetoed;
        }

        self.before_shutdown().await;
        CloseDecision::Close
    }

    /// Forward an audio event to the recording page.
    ///
    /// Returns [`ShellSignal::Shutdown`] when this event completes a
    /// deferred close.
    pub async fn handle_audio_event(&mut self, event: AudioEvent) -> ShellSignal {
        let stopped = matches!(event, AudioEvent::Stopped(_));

        if let Err(e) = self
            .recording_page
            .handle_audio_event(event, &self.audio, self.options.options())
            .await
        {
            error!(error = %e, "Failed to handle audio event");
        }

        if stopped && self.close_pending {
            self.close_pending = false;
            self.before_shutdown().await;
            return ShellSignal::Shutdown;
        }
        ShellSignal::Continue
    }

    /// Broadcast the pre-shutdown notification to the pages
    async fn before_shutdown(&mut self) {
        debug!(page = %self.current_page, "Before shutdown");
        self.settings_page.before_shutdown(&mut self.options).await;
    }

    fn require_page(&self, page: Page) -> Result<(), PageError> {
        if self.current_page != page {
            return Err(PageError::WrongPage(self.current_page));
        }
        Ok(())
    }
}
