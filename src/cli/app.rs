//! Interactive session: stdin commands, audio events and close signals

use std::path::PathBuf;
use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::application::ports::{
    AudioEvent, AudioEventReceiver, AudioService, FolderOpener, OptionsStore,
};
use crate::application::{CloseDecision, OptionsService, RecordingDestination, Shell, ShellSignal};
use crate::domain::navigation::Page;
use crate::domain::options::OptionKey;
use crate::infrastructure::{CpalAudioService, SystemFolderOpener, TomlOptionsStore};

use super::args::Cli;
use super::commands::SessionCommand;
use super::presenter::{Choice, Presenter};
use super::signals::CloseSignalHandler;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Options store at `--options-file`, or the default location
pub fn options_store(options_file: Option<PathBuf>) -> TomlOptionsStore {
    match options_file {
        Some(path) => TomlOptionsStore::with_path(path),
        None => TomlOptionsStore::new(),
    }
}

/// Run the interactive session until the user quits or a close goes through
pub async fn run_interactive(cli: &Cli) -> ExitCode {
    let presenter = Presenter::new();

    let mut signals = match CloseSignalHandler::new() {
        Ok(signals) => signals,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let store = options_store(cli.options_file.clone());
    let options = OptionsService::load(store).await;

    let (events_tx, events) = mpsc::unbounded_channel();
    let audio = CpalAudioService::new(events_tx);
    let destination = RecordingDestination::new(cli.id.clone());
    let shell = Shell::new(audio, SystemFolderOpener::new(), options, destination);

    let mut session = Session {
        shell,
        presenter,
        close_when_idle: false,
    };
    session.run(events, &mut signals).await
}

/// What the loop does after a command or event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

struct Session<A, S, F>
where
    A: AudioService,
    S: OptionsStore,
    F: FolderOpener,
{
    shell: Shell<A, S, F>,
    presenter: Presenter,
    /// stdin is gone and a close was vetoed; retry once the recording ends
    close_when_idle: bool,
}

impl<A, S, F> Session<A, S, F>
where
    A: AudioService,
    S: OptionsStore,
    F: FolderOpener,
{
    async fn run(
        &mut self,
        mut events: AudioEventReceiver,
        signals: &mut CloseSignalHandler,
    ) -> ExitCode {
        if let Err(e) = self.shell.start().await {
            self.presenter.error(&e.to_string());
        }
        if self.shell.recording_page_mut().take_splash() {
            self.presenter.splash();
        }
        self.show_page();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;

        loop {
            let flow = tokio::select! {
                line = lines.next_line(), if stdin_open => match line {
                    Ok(Some(line)) => {
                        let flow = self.handle_line(&line).await;
                        self.presenter.prompt(self.shell.current_page());
                        flow
                    }
                    Ok(None) | Err(_) => {
                        debug!("stdin closed");
                        stdin_open = false;
                        let flow = self.close().await;
                        if flow == Flow::Continue && !self.shell.is_close_pending() {
                            self.close_when_idle = true;
                        }
                        flow
                    }
                },
                Some(event) = events.recv() => self.handle_event(event).await,
                Some(signal) = signals.recv() => {
                    info!(signal = signal.as_str(), "Close requested");
                    self.close().await
                }
                else => Flow::Exit,
            };

            if flow == Flow::Exit {
                break;
            }
        }

        self.presenter.finish_recording_progress();
        ExitCode::from(EXIT_SUCCESS)
    }

    async fn handle_line(&mut self, line: &str) -> Flow {
        let command = match SessionCommand::parse(line, self.shell.current_page()) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(e) => {
                self.presenter.error(&e.to_string());
                return Flow::Continue;
            }
        };

        match command {
            SessionCommand::Quit => return self.close().await,
            SessionCommand::Help => self.presenter.help(self.shell.current_page()),
            SessionCommand::Record => {
                let result = self.shell.start_recording().await;
                self.report(result);
            }
            SessionCommand::Stop => {
                let result = self.shell.stop_recording().await;
                if result.is_ok() {
                    self.presenter.recording_stopping();
                }
                self.report(result);
            }
            SessionCommand::Toggle => {
                let was_recording = self.shell.recording_page().is_recording_or_stopping();
                let result = self.shell.toggle_recording().await;
                if result.is_ok() && was_recording {
                    self.presenter.recording_stopping();
                }
                self.report(result);
            }
            SessionCommand::Settings => {
                let result = self.shell.show_settings().await;
                if result.is_ok() {
                    self.show_page();
                }
                self.report(result);
            }
            SessionCommand::List => self.presenter.option_list(self.shell.options()),
            SessionCommand::Devices => self.presenter.device_items(
                self.shell.settings_page().recording_devices(),
                self.shell.options().recording_device(),
            ),
            SessionCommand::Choices => {
                for (key, choices) in self.choices() {
                    self.presenter.choice_list(key, &choices);
                }
            }
            SessionCommand::Set { key, value } => match self.shell.set_option(key, &value) {
                Ok(()) => {
                    let shown = self
                        .shell
                        .options()
                        .get_by_key(key)
                        .unwrap_or_else(|| "(default)".to_string());
                    self.presenter.success(&format!("{} = {}", key, shown));
                }
                Err(e) => self.presenter.error(&e.to_string()),
            },
            SessionCommand::Destination(folder) => {
                match self.shell.select_destination_folder(folder) {
                    Ok(()) => {
                        let root = self
                            .shell
                            .recording_page()
                            .destination()
                            .root(self.shell.options());
                        self.presenter
                            .success(&format!("Recordings go to {}", root.display()));
                    }
                    Err(e) => self.presenter.error(&e.to_string()),
                }
            }
            SessionCommand::ShowRecordings => match self.shell.show_recordings().await {
                Ok(folder) => {
                    self.presenter.output(&folder.path.to_string_lossy());
                    if let Some(e) = folder.open_error {
                        self.presenter.warn(&format!("Could not open folder: {}", e));
                    }
                }
                Err(e) => self.presenter.error(&e.to_string()),
            },
            SessionCommand::Back => {
                let result = self.shell.leave_settings().await;
                if result.is_ok() {
                    self.show_page();
                }
                self.report(result);
            }
        }
        Flow::Continue
    }

    async fn handle_event(&mut self, event: AudioEvent) -> Flow {
        match &event {
            AudioEvent::Started => {
                let title = self
                    .shell
                    .recording_page()
                    .current_recording()
                    .map(|c| c.title())
                    .unwrap_or_default();
                self.presenter.start_recording_progress(&title);
            }
            AudioEvent::Progress { .. } => {}
            AudioEvent::StopRequested => {
                self.presenter.info("Maximum recording time reached");
                self.presenter.recording_stopping();
            }
            AudioEvent::Stopped(_) => {}
        }

        let stopped = matches!(event, AudioEvent::Stopped(_));
        let progress = matches!(event, AudioEvent::Progress { .. });
        let signal = self.shell.handle_audio_event(event).await;

        if progress {
            let page = self.shell.recording_page();
            let title = page
                .current_recording()
                .map(|c| c.title())
                .unwrap_or_default();
            self.presenter
                .update_recording_progress(&title, page.elapsed_ms(), page.peak_level());
        }

        if stopped {
            self.presenter.finish_recording_progress();
            let page = self.shell.recording_page();
            match (page.last_error(), page.last_saved()) {
                (Some(e), _) => self.presenter.error(e),
                (None, Some(path)) => self.presenter.success(&format!("Saved {}", path.display())),
                (None, None) => {}
            }

            if signal == ShellSignal::Shutdown {
                return Flow::Exit;
            }
            if self.close_when_idle {
                return self.close().await;
            }
            self.presenter.prompt(self.shell.current_page());
        }
        Flow::Continue
    }

    async fn close(&mut self) -> Flow {
        match self.shell.request_close().await {
            CloseDecision::Close => Flow::Exit,
            CloseDecision::Deferred => {
                self.presenter.info("Finishing the recording before closing...");
                self.presenter.recording_stopping();
                Flow::Continue
            }
            CloseDecision::Vetoed => {
                self.presenter.warn(
                    "Recording in progress. Stop it first, or set allow_close_when_recording",
                );
                Flow::Continue
            }
        }
    }

    /// Settings lists with the current option values marked
    fn choices(&self) -> Vec<(OptionKey, Vec<Choice>)> {
        let page = self.shell.settings_page();
        let options = self.shell.options();
        let choice = |value: String, name: &str, selected: bool| Choice {
            value,
            name: name.to_string(),
            selected,
        };

        vec![
            (
                OptionKey::SampleRate,
                page.sample_rates()
                    .iter()
                    .map(|item| {
                        let rate = item.actual_sample_rate;
                        choice(rate.to_string(), &item.name, rate == options.sample_rate())
                    })
                    .collect(),
            ),
            (
                OptionKey::ChannelCount,
                page.channels()
                    .iter()
                    .map(|item| {
                        let count = item.channel_count;
                        choice(count.to_string(), &item.name, count == options.channel_count())
                    })
                    .collect(),
            ),
            (
                OptionKey::Mp3BitRate,
                page.bit_rates()
                    .iter()
                    .map(|item| {
                        let rate = item.actual_bit_rate;
                        choice(rate.to_string(), &item.name, rate == options.mp3_bit_rate())
                    })
                    .collect(),
            ),
            (
                OptionKey::MaxRecordingTimeMins,
                page.max_recording_times()
                    .iter()
                    .map(|item| {
                        let mins = item.actual_minutes;
                        let selected = mins == options.max_recording_time_mins();
                        choice(mins.to_string(), &item.name, selected)
                    })
                    .collect(),
            ),
        ]
    }

    fn show_page(&self) {
        let page = self.shell.current_page();
        self.presenter.page(page);
        if page == Page::Recording {
            self.presenter.status(self.shell.recording_page().status());
        }
        self.presenter.info("Type 'help' for commands");
        self.presenter.prompt(page);
    }

    fn report<T, E: std::fmt::Display>(&self, result: Result<T, E>) {
        if let Err(e) = result {
            self.presenter.error(&e.to_string());
        }
    }
}
