//! Show-recordings command handler

use chrono::Local;

use crate::application::ports::{FolderOpener, OptionsStore};
use crate::application::{OptionsService, RecordingDestination};

use super::presenter::Presenter;

/// Print the most relevant recordings folder and, unless `no_open`, open it
pub async fn handle_show_recordings<S: OptionsStore, F: FolderOpener>(
    store: S,
    opener: &F,
    identifier: Option<String>,
    no_open: bool,
    presenter: &Presenter,
) {
    let options = OptionsService::load(store).await;
    let destination = RecordingDestination::new(identifier);
    let folder = destination.folder_to_show(Local::now().date_naive(), options.options());

    presenter.output(&folder.to_string_lossy());

    if !no_open {
        if let Err(e) = opener.open(&folder).await {
            presenter.warn(&format!("Could not open folder: {}", e));
        }
    }
}
