//! CLI presenter for output formatting

use std::io::{self, Write};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::RecordingDeviceInfo;
use crate::domain::navigation::Page;
use crate::domain::options::{OptionKey, Options, RecordingDeviceItem};
use crate::domain::recording::RecordingStatus;

const LEVEL_BAR_WIDTH: usize = 20;

/// One selectable value of a settings list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// What `set <key> <value>` expects
    pub value: String,
    pub name: String,
    pub selected: bool,
}

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Banner shown when the recording page opens with the splash
    pub fn splash(&self) {
        eprintln!();
        eprintln!("  {}", "OnlyR".bold().red());
        eprintln!("  {}", format!("v{}", env!("CARGO_PKG_VERSION")).dimmed());
        eprintln!();
    }

    /// Start the live recording line
    pub fn start_recording_progress(&mut self, title: &str) {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("●○ ")
            .template("{spinner:.red} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(format!("{} {}", title, self.format_progress(0, 0.0)));
        spinner.enable_steady_tick(std::time::Duration::from_millis(500));
        self.spinner = Some(spinner);
    }

    /// Update the live recording line
    pub fn update_recording_progress(&self, title: &str, elapsed_ms: u64, peak_level: f32) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(format!(
                "{} {}",
                title,
                self.format_progress(elapsed_ms, peak_level)
            ));
        }
    }

    /// Show "stopping" on the live line
    pub fn recording_stopping(&self) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message("Stopping...".to_string());
        }
    }

    /// Clear the live recording line
    pub fn finish_recording_progress(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.println(format!("{} {}", "ℹ".cyan(), message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        self.println(format!("{} {}", "✓".green(), message));
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        self.println(format!("{} {}", "⚠".yellow(), message));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.println(format!("{} {}", "✗".red(), message));
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print the interactive prompt
    pub fn prompt(&self, page: Page) {
        if self.spinner.is_some() {
            return;
        }
        eprint!("{} ", format!("{}>", page).bold());
        let _ = io::stderr().flush();
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print every option
    pub fn option_list(&self, options: &Options) {
        for key in OptionKey::ALL {
            let value = options
                .get_by_key(*key)
                .unwrap_or_else(|| "(default)".to_string());
            self.key_value(key.as_str(), &value);
        }
    }

    pub fn page(&self, page: Page) {
        self.println(format!("{} {} page", "»".cyan(), page));
    }

    pub fn status(&self, status: RecordingStatus) {
        let text = match status {
            RecordingStatus::NotRecording => status.as_str().normal(),
            RecordingStatus::Recording => status.as_str().red().bold(),
            RecordingStatus::StopRequested => status.as_str().yellow(),
        };
        self.println(format!("{} {}", "●".cyan(), text));
    }

    /// Devices as reported by the audio service
    pub fn device_list(&self, devices: &[RecordingDeviceInfo]) {
        if devices.is_empty() {
            self.warn("No audio input devices found");
            return;
        }
        for device in devices {
            self.output(&format_device(device.id, &device.name, device.is_default));
        }
    }

    /// Devices from the settings page, marking the selected one
    pub fn device_items(&self, devices: &[RecordingDeviceItem], selected: usize) {
        if devices.is_empty() {
            self.warn("No audio input devices found");
            return;
        }
        for device in devices {
            let marker = if device.device_id == selected { "›" } else { " " };
            self.output(&format!(
                "{} {}",
                marker.green(),
                format_device(device.device_id, &device.device_name, device.is_default)
            ));
        }
    }

    /// Allowed values for `key`, marking the current one
    pub fn choice_list(&self, key: OptionKey, choices: &[Choice]) {
        self.output(&key.as_str().cyan().to_string());
        for choice in choices {
            self.output(&format_choice(choice));
        }
    }

    pub fn help(&self, page: Page) {
        let commands: &[(&str, &str)] = match page {
            Page::Recording => &[
                ("record, r", "Start recording"),
                ("stop, s", "Stop recording"),
                ("toggle, t", "Start or stop recording"),
                ("settings", "Open the settings page"),
            ],
            Page::Settings => &[
                ("list", "Show all options"),
                ("devices", "List recording devices"),
                ("choices", "Show allowed values"),
                ("set <key> <value>", "Change an option"),
                ("dest <path>", "Choose the recordings folder"),
                ("show", "Open the recordings folder"),
                ("back", "Save and return to the recording page"),
            ],
        };

        for (command, description) in commands
            .iter()
            .chain(&[("help, ?", "Show this help"), ("quit, q", "Exit")])
        {
            self.println(format!("  {:<20} {}", command.cyan(), description));
        }
    }

    /// `00:01:05  [████░░░░…]`
    pub fn format_progress(&self, elapsed_ms: u64, peak_level: f32) -> String {
        let filled = ((peak_level.clamp(0.0, 1.0) * LEVEL_BAR_WIDTH as f32).round()) as usize;
        let empty = LEVEL_BAR_WIDTH - filled;

        format!(
            "{}  [{}{}]",
            format_elapsed(elapsed_ms),
            "█".repeat(filled).green(),
            "░".repeat(empty)
        )
    }

    /// Print above the live line if there is one
    fn println(&self, line: String) {
        match self.spinner {
            Some(ref spinner) => spinner.println(line),
            None => eprintln!("{}", line),
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// `hh:mm:ss`
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let secs = elapsed_ms / 1000;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

fn format_choice(choice: &Choice) -> String {
    let marker = if choice.selected { "›" } else { " " };
    format!("{} {:>6}  {}", marker.green(), choice.value, choice.name)
}

fn format_device(id: usize, name: &str, is_default: bool) -> String {
    if is_default {
        format!("{:>3}  {} {}", id, name, "(default)".dimmed())
    } else {
        format!("{:>3}  {}", id, name)
    }
}
