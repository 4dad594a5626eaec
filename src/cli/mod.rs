//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! the subcommand handlers and the interactive session.

pub mod app;
pub mod args;
pub mod commands;
pub mod config_cmd;
pub mod devices_cmd;
pub mod presenter;
pub mod recordings_cmd;
pub mod signals;

// Re-export commonly used types
pub use app::{options_store, run_interactive, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction};
pub use presenter::Presenter;
