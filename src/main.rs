//! OnlyR CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::debug;

use onlyr::cli::{
    app::{options_store, run_interactive, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    devices_cmd::handle_devices_command,
    presenter::Presenter,
    recordings_cmd::handle_show_recordings,
};
use onlyr::infrastructure::{logging, CpalAudioService, SystemFolderOpener};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_file = logging::init(cli.verbose);
    debug!(log_file = ?log_file, "OnlyR starting");

    let presenter = Presenter::new();

    match cli.command {
        Some(Commands::Config { action }) => {
            let store = options_store(cli.options_file.clone());
            let (events, _) = mpsc::unbounded_channel();
            let audio = CpalAudioService::new(events);
            if let Err(e) = handle_config_command(action, &store, &audio, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Some(Commands::Devices { json }) => {
            if let Err(e) = handle_devices_command(json, &presenter) {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Some(Commands::ShowRecordings { no_open }) => {
            let store = options_store(cli.options_file.clone());
            handle_show_recordings(
                store,
                &SystemFolderOpener::new(),
                cli.id.clone(),
                no_open,
                &presenter,
            )
            .await;
            ExitCode::SUCCESS
        }
        None => run_interactive(&cli).await,
    }
}
