//! Interactive session commands read from stdin

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::navigation::Page;
use crate::domain::options::OptionKey;

/// A command typed at the session prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Quit,
    Help,
    Record,
    Stop,
    Toggle,
    Settings,
    List,
    Devices,
    Choices,
    Set { key: OptionKey, value: String },
    Destination(PathBuf),
    ShowRecordings,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list")]
    Unknown(String),

    #[error("'{command}' is not available on the {page} page")]
    WrongPage { command: String, page: Page },

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown option '{key}'. Valid keys: {valid}")]
    UnknownKey { key: String, valid: String },
}

impl SessionCommand {
    /// Parse a line for the given page. Blank lines yield `None`.
    pub fn parse(line: &str, page: Page) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word {
            "" => return Ok(None),
            "quit" | "q" | "exit" => Self::Quit,
            "help" | "?" => Self::Help,
            "record" | "r" => Self::Record,
            "stop" | "s" => Self::Stop,
            "toggle" | "t" => Self::Toggle,
            "settings" => Self::Settings,
            "list" => Self::List,
            "devices" => Self::Devices,
            "choices" => Self::Choices,
            "set" => parse_set(rest)?,
            "dest" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("dest <path>"));
                }
                Self::Destination(PathBuf::from(rest))
            }
            "show" => Self::ShowRecordings,
            "back" => Self::Back,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        if !command.available_on(page) {
            return Err(CommandError::WrongPage {
                command: word.to_string(),
                page,
            });
        }
        Ok(Some(command))
    }

    fn available_on(&self, page: Page) -> bool {
        match self {
            Self::Quit | Self::Help => true,
            Self::Record | Self::Stop | Self::Toggle | Self::Settings => page == Page::Recording,
            Self::List
            | Self::Devices
            | Self::Choices
            | Self::Set { .. }
            | Self::Destination(_)
            | Self::ShowRecordings
            | Self::Back => page == Page::Settings,
        }
    }
}

fn parse_set(rest: &str) -> Result<SessionCommand, CommandError> {
    let (key, value) = rest
        .split_once(char::is_whitespace)
        .map(|(k, v)| (k, v.trim()))
        .unwrap_or((rest, ""));
    if key.is_empty() {
        return Err(CommandError::Usage("set <key> <value>"));
    }

    let key = key
        .parse::<OptionKey>()
        .map_err(|_| CommandError::UnknownKey {
            key: key.to_string(),
            valid: OptionKey::valid_keys(),
        })?;

    Ok(SessionCommand::Set {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str, page: Page) -> Result<Option<SessionCommand>, CommandError> {
        SessionCommand::parse(line, page)
    }

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(parse("   ", Page::Recording), Ok(None));
    }

    #[test]
    fn recording_page_shortcuts() {
        assert_eq!(parse("r", Page::Recording), Ok(Some(SessionCommand::Record)));
        assert_eq!(parse("s", Page::Recording), Ok(Some(SessionCommand::Stop)));
        assert_eq!(parse(" t ", Page::Recording), Ok(Some(SessionCommand::Toggle)));
        assert_eq!(
            parse("settings", Page::Recording),
            Ok(Some(SessionCommand::Settings))
        );
    }

    #[test]
    fn global_commands_work_on_both_pages() {
        for page in [Page::Recording, Page::Settings] {
            assert_eq!(parse("q", page), Ok(Some(SessionCommand::Quit)));
            assert_eq!(parse("?", page), Ok(Some(SessionCommand::Help)));
        }
    }

    #[test]
    fn settings_commands_refused_on_recording_page() {
        assert!(matches!(
            parse("back", Page::Recording),
            Err(CommandError::WrongPage { .. })
        ));
        assert!(matches!(
            parse("record", Page::Settings),
            Err(CommandError::WrongPage { .. })
        ));
    }

    #[test]
    fn choices_only_on_settings_page() {
        assert_eq!(
            parse("choices", Page::Settings),
            Ok(Some(SessionCommand::Choices))
        );
        assert!(matches!(
            parse("choices", Page::Recording),
            Err(CommandError::WrongPage { .. })
        ));
    }

    #[test]
    fn set_keeps_value_with_spaces() {
        assert_eq!(
            parse("set genre Sunday Talk", Page::Settings),
            Ok(Some(SessionCommand::Set {
                key: OptionKey::Genre,
                value: "Sunday Talk".to_string(),
            }))
        );
    }

    #[test]
    fn set_allows_empty_value() {
        assert_eq!(
            parse("set destination_folder", Page::Settings),
            Ok(Some(SessionCommand::Set {
                key: OptionKey::DestinationFolder,
                value: String::new(),
            }))
        );
    }

    #[test]
    fn set_rejects_unknown_key() {
        assert!(matches!(
            parse("set volume 11", Page::Settings),
            Err(CommandError::UnknownKey { .. })
        ));
        assert_eq!(
            parse("set", Page::Settings),
            Err(CommandError::Usage("set <key> <value>"))
        );
    }

    #[test]
    fn dest_takes_rest_of_line() {
        assert_eq!(
            parse("dest /home/me/My Recordings", Page::Settings),
            Ok(Some(SessionCommand::Destination(PathBuf::from(
                "/home/me/My Recordings"
            ))))
        );
        assert!(parse("dest", Page::Settings).is_err());
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse("dance", Page::Recording),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }
}
