//! tracing subscriber setup
//!
//! The interactive session owns the terminal, so logs go to a file under the
//! data directory. If that can't be opened they go to stderr instead.

use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "ONLYR_LOG";

/// `<data dir>/onlyr/logs/onlyr.log`
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("onlyr").join("logs").join("onlyr.log"))
}

fn open_log_file(path: &PathBuf) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| if verbose { "onlyr=debug" } else { "onlyr=info" }.into())
}

/// Install the global subscriber.
///
/// # Returns
/// The log file in use, or `None` when logging to stderr
pub fn init(verbose: bool) -> Option<PathBuf> {
    let file = default_log_path().and_then(|path| match open_log_file(&path) {
        Ok(file) => Some((path, file)),
        Err(e) => {
            eprintln!("Could not open log file {}: {}", path.display(), e);
            None
        }
    });

    match file {
        Some((path, file)) => {
            let _ = tracing_subscriber::registry()
                .with(filter(verbose))
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init();
            Some(path)
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(filter(verbose))
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init();
            None
        }
    }
}
