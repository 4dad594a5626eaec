//! Pages and the state handed to a page when it becomes active

use std::fmt;

/// The two pages of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Recording,
    Settings,
}

impl Page {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recording => "recording",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State passed to the recording page on navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordingPageState {
    /// Show the startup banner
    pub show_splash: bool,
    /// Begin recording as soon as the page is active
    pub start_recording: bool,
}

/// Transient payload for a navigation event, consumed by the target page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationState {
    #[default]
    None,
    Recording(RecordingPageState),
}

/// A request to show `target` with `state`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationRequest {
    pub target: Page,
    pub state: NavigationState,
}

impl NavigationRequest {
    pub fn to(target: Page) -> Self {
        Self {
            target,
            state: NavigationState::None,
        }
    }

    pub fn with_state(target: Page, state: NavigationState) -> Self {
        Self { target, state }
    }
}
