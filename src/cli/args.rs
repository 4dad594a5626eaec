//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// OnlyR - simple audio recorder
#[derive(Parser, Debug)]
#[command(name = "onlyr")]
#[command(version)]
#[command(about = "Record audio to dated MP3/WAV files")]
#[command(long_about = None)]
pub struct Cli {
    /// Identifier that gets its own sub-folder of the recordings root
    #[arg(long = "id", value_name = "ID")]
    pub id: Option<String>,

    /// Options file to use instead of the default
    #[arg(long, value_name = "PATH", env = "ONLYR_OPTIONS_FILE", global = true)]
    pub options_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List audio input devices
    Devices {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print (and open) the most relevant recordings folder
    ShowRecordings {
        /// Only print the folder
        #[arg(long)]
        no_open: bool,
    },
    /// Manage options
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create options file with defaults
    Init,
    /// Set an option
    Set {
        /// Option key
        key: String,
        /// Option value
        value: String,
    },
    /// Get an option
    Get {
        /// Option key
        key: String,
    },
    /// List all options
    List,
    /// Show options file path
    Path,
}
