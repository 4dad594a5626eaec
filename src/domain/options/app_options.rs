//! Recording options value object

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::items::{
    SUPPORTED_CHANNELS, SUPPORTED_MAX_RECORDING_MINUTES, SUPPORTED_MP3_BIT_RATES,
    SUPPORTED_SAMPLE_RATES,
};
use crate::domain::error::OptionsError;

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_CHANNEL_COUNT: u16 = 1;
pub const DEFAULT_MP3_BIT_RATE: u32 = 96;
pub const DEFAULT_GENRE: &str = "Speech";

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    #[default]
    Mp3,
    Wav,
}

impl AudioCodec {
    /// File extension without the dot
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
        }
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for AudioCodec {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mp3" => Ok(Self::Mp3),
            "wav" => Ok(Self::Wav),
            _ => Err(OptionsError::InvalidCodec(s.to_string())),
        }
    }
}

/// Persisted user settings.
///
/// Fields are private so that every mutation goes through a validating
/// setter. Missing fields in a stored file fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    recording_device: usize,
    sample_rate: u32,
    channel_count: u16,
    mp3_bit_rate: u32,
    codec: AudioCodec,
    max_recording_time_mins: u32,
    fade_out: bool,
    genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination_folder: Option<PathBuf>,
    always_on_top: bool,
    allow_close_when_recording: bool,
    start_recording_on_launch: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            recording_device: 0,
            sample_rate: DEFAULT_SAMPLE_RATE,
            channel_count: DEFAULT_CHANNEL_COUNT,
            mp3_bit_rate: DEFAULT_MP3_BIT_RATE,
            codec: AudioCodec::Mp3,
            max_recording_time_mins: 0,
            fade_out: true,
            genre: DEFAULT_GENRE.to_string(),
            destination_folder: None,
            always_on_top: true,
            allow_close_when_recording: false,
            start_recording_on_launch: false,
        }
    }
}

impl Options {
    pub fn recording_device(&self) -> usize {
        self.recording_device
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    pub fn mp3_bit_rate(&self) -> u32 {
        self.mp3_bit_rate
    }

    pub fn codec(&self) -> AudioCodec {
        self.codec
    }

    /// Max recording time in minutes, 0 = no limit
    pub fn max_recording_time_mins(&self) -> u32 {
        self.max_recording_time_mins
    }

    pub fn fade_out(&self) -> bool {
        self.fade_out
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Configured destination root, if any
    pub fn destination_folder(&self) -> Option<&Path> {
        self.destination_folder.as_deref()
    }

    pub fn always_on_top(&self) -> bool {
        self.always_on_top
    }

    pub fn allow_close_when_recording(&self) -> bool {
        self.allow_close_when_recording
    }

    pub fn start_recording_on_launch(&self) -> bool {
        self.start_recording_on_launch
    }

    /// Device ids are validated against the live device list by the caller.
    pub fn set_recording_device(&mut self, device_id: usize) {
        self.recording_device = device_id;
    }

    pub fn set_sample_rate(&mut self, rate: u32) -> Result<(), OptionsError> {
        if !SUPPORTED_SAMPLE_RATES.contains(&rate) {
            return Err(OptionsError::UnsupportedSampleRate(rate));
        }
        self.sample_rate = rate;
        Ok(())
    }

    pub fn set_channel_count(&mut self, count: u16) -> Result<(), OptionsError> {
        if !SUPPORTED_CHANNELS.contains(&count) {
            return Err(OptionsError::UnsupportedChannelCount(count));
        }
        self.channel_count = count;
        Ok(())
    }

    pub fn set_mp3_bit_rate(&mut self, rate: u32) -> Result<(), OptionsError> {
        if !SUPPORTED_MP3_BIT_RATES.contains(&rate) {
            return Err(OptionsError::UnsupportedBitRate(rate));
        }
        self.mp3_bit_rate = rate;
        Ok(())
    }

    pub fn set_codec(&mut self, codec: AudioCodec) {
        self.codec = codec;
    }

    pub fn set_max_recording_time_mins(&mut self, minutes: u32) -> Result<(), OptionsError> {
        if !SUPPORTED_MAX_RECORDING_MINUTES.contains(&minutes) {
            return Err(OptionsError::UnsupportedMaxRecordingTime(minutes));
        }
        self.max_recording_time_mins = minutes;
        Ok(())
    }

    pub fn set_fade_out(&mut self, fade_out: bool) {
        self.fade_out = fade_out;
    }

    pub fn set_genre(&mut self, genre: &str) {
        self.genre = genre.trim().to_string();
    }

    /// Set the destination root. An empty path resets to the default folder.
    pub fn set_destination_folder(&mut self, folder: Option<PathBuf>) -> Result<(), OptionsError> {
        let folder = folder.filter(|p| !p.as_os_str().is_empty());
        if let Some(ref path) = folder {
            if path.is_file() {
                return Err(OptionsError::DestinationNotAFolder(path.clone()));
            }
        }
        self.destination_folder = folder;
        Ok(())
    }

    pub fn set_always_on_top(&mut self, value: bool) {
        self.always_on_top = value;
    }

    pub fn set_allow_close_when_recording(&mut self, value: bool) {
        self.allow_close_when_recording = value;
    }

    pub fn set_start_recording_on_launch(&mut self, value: bool) {
        self.start_recording_on_launch = value;
    }

    /// Reset any unsupported values (e.g. from a hand-edited file) to defaults.
    /// Returns the keys that were reset.
    pub fn sanitize(&mut self) -> Vec<OptionKey> {
        let defaults = Self::default();
        let mut reset = Vec::new();

        if !SUPPORTED_SAMPLE_RATES.contains(&self.sample_rate) {
            self.sample_rate = defaults.sample_rate;
            reset.push(OptionKey::SampleRate);
        }
        if !SUPPORTED_CHANNELS.contains(&self.channel_count) {
            self.channel_count = defaults.channel_count;
            reset.push(OptionKey::ChannelCount);
        }
        if !SUPPORTED_MP3_BIT_RATES.contains(&self.mp3_bit_rate) {
            self.mp3_bit_rate = defaults.mp3_bit_rate;
            reset.push(OptionKey::Mp3BitRate);
        }
        if !SUPPORTED_MAX_RECORDING_MINUTES.contains(&self.max_recording_time_mins) {
            self.max_recording_time_mins = defaults.max_recording_time_mins;
            reset.push(OptionKey::MaxRecordingTimeMins);
        }
        if self
            .destination_folder
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty() || p.is_file())
        {
            self.destination_folder = None;
            reset.push(OptionKey::DestinationFolder);
        }

        reset
    }

    /// Set a value from its string form (config command, interactive `set`)
    pub fn set_by_key(&mut self, key: OptionKey, value: &str) -> Result<(), OptionsError> {
        let value = value.trim();
        match key {
            OptionKey::RecordingDevice => self.set_recording_device(parse_number(key, value)?),
            OptionKey::SampleRate => self.set_sample_rate(parse_number(key, value)?)?,
            OptionKey::ChannelCount => self.set_channel_count(parse_number(key, value)?)?,
            OptionKey::Mp3BitRate => self.set_mp3_bit_rate(parse_number(key, value)?)?,
            OptionKey::Codec => self.set_codec(value.parse()?),
            OptionKey::MaxRecordingTimeMins => {
                self.set_max_recording_time_mins(parse_number(key, value)?)?
            }
            OptionKey::FadeOut => self.set_fade_out(parse_bool(key, value)?),
            OptionKey::Genre => self.set_genre(value),
            OptionKey::DestinationFolder => {
                self.set_destination_folder(Some(PathBuf::from(value)))?
            }
            OptionKey::AlwaysOnTop => self.set_always_on_top(parse_bool(key, value)?),
            OptionKey::AllowCloseWhenRecording => {
                self.set_allow_close_when_recording(parse_bool(key, value)?)
            }
            OptionKey::StartRecordingOnLaunch => {
                self.set_start_recording_on_launch(parse_bool(key, value)?)
            }
        }
        Ok(())
    }

    /// String form of a value. `None` when unset.
    pub fn get_by_key(&self, key: OptionKey) -> Option<String> {
        match key {
            OptionKey::RecordingDevice => Some(self.recording_device.to_string()),
            OptionKey::SampleRate => Some(self.sample_rate.to_string()),
            OptionKey::ChannelCount => Some(self.channel_count.to_string()),
            OptionKey::Mp3BitRate => Some(self.mp3_bit_rate.to_string()),
            OptionKey::Codec => Some(self.codec.to_string()),
            OptionKey::MaxRecordingTimeMins => Some(self.max_recording_time_mins.to_string()),
            OptionKey::FadeOut => Some(self.fade_out.to_string()),
            OptionKey::Genre => Some(self.genre.clone()),
            OptionKey::DestinationFolder => self
                .destination_folder
                .as_ref()
                .map(|p| p.display().to_string()),
            OptionKey::AlwaysOnTop => Some(self.always_on_top.to_string()),
            OptionKey::AllowCloseWhenRecording => {
                Some(self.allow_close_when_recording.to_string())
            }
            OptionKey::StartRecordingOnLaunch => {
                Some(self.start_recording_on_launch.to_string())
            }
        }
    }
}

/// Keys addressable by `config get/set` and the settings page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    RecordingDevice,
    SampleRate,
    ChannelCount,
    Mp3BitRate,
    Codec,
    MaxRecordingTimeMins,
    FadeOut,
    Genre,
    DestinationFolder,
    AlwaysOnTop,
    AllowCloseWhenRecording,
    StartRecordingOnLaunch,
}

impl OptionKey {
    pub const ALL: &'static [OptionKey] = &[
        Self::RecordingDevice,
        Self::SampleRate,
        Self::ChannelCount,
        Self::Mp3BitRate,
        Self::Codec,
        Self::MaxRecordingTimeMins,
        Self::FadeOut,
        Self::Genre,
        Self::DestinationFolder,
        Self::AlwaysOnTop,
        Self::AllowCloseWhenRecording,
        Self::StartRecordingOnLaunch,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RecordingDevice => "recording_device",
            Self::SampleRate => "sample_rate",
            Self::ChannelCount => "channel_count",
            Self::Mp3BitRate => "mp3_bit_rate",
            Self::Codec => "codec",
            Self::MaxRecordingTimeMins => "max_recording_time_mins",
            Self::FadeOut => "fade_out",
            Self::Genre => "genre",
            Self::DestinationFolder => "destination_folder",
            Self::AlwaysOnTop => "always_on_top",
            Self::AllowCloseWhenRecording => "allow_close_when_recording",
            Self::StartRecordingOnLaunch => "start_recording_on_launch",
        }
    }

    /// Comma-separated list of all keys, for error messages
    pub fn valid_keys() -> String {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OptionKey {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| OptionsError::UnknownKey(s.to_string()))
    }
}

fn parse_number<T: FromStr>(key: OptionKey, value: &str) -> Result<T, OptionsError> {
    value.parse().map_err(|_| OptionsError::InvalidValue {
        key: key.to_string(),
        message: format!("\"{}\" is not a number", value),
    })
}

fn parse_bool(key: OptionKey, value: &str) -> Result<bool, OptionsError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(OptionsError::InvalidValue {
            key: key.to_string(),
            message: "Value must be 'true' or 'false'".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let options = Options::default();
        assert_eq!(options.recording_device(), 0);
        assert_eq!(options.sample_rate(), 44100);
        assert_eq!(options.channel_count(), 1);
        assert_eq!(options.mp3_bit_rate(), 96);
        assert_eq!(options.codec(), AudioCodec::Mp3);
        assert_eq!(options.max_recording_time_mins(), 0);
        assert!(options.fade_out());
        assert_eq!(options.genre(), "Speech");
        assert!(options.destination_folder().is_none());
        assert!(options.always_on_top());
        assert!(!options.allow_close_when_recording());
        assert!(!options.start_recording_on_launch());
    }

    #[test]
    fn setters_round_trip() {
        let mut options = Options::default();
        options.set_recording_device(3);
        options.set_sample_rate(48000).unwrap();
        options.set_channel_count(2).unwrap();
        options.set_mp3_bit_rate(192).unwrap();
        options.set_codec(AudioCodec::Wav);
        options.set_max_recording_time_mins(45).unwrap();
        options.set_fade_out(false);
        options.set_genre("Meeting");
        options
            .set_destination_folder(Some(PathBuf::from("/recordings")))
            .unwrap();
        options.set_always_on_top(false);
        options.set_allow_close_when_recording(true);
        options.set_start_recording_on_launch(true);

        assert_eq!(options.recording_device(), 3);
        assert_eq!(options.sample_rate(), 48000);
        assert_eq!(options.channel_count(), 2);
        assert_eq!(options.mp3_bit_rate(), 192);
        assert_eq!(options.codec(), AudioCodec::Wav);
        assert_eq!(options.max_recording_time_mins(), 45);
        assert!(!options.fade_out());
        assert_eq!(options.genre(), "Meeting");
        assert_eq!(options.destination_folder(), Some(Path::new("/recordings")));
        assert!(!options.always_on_top());
        assert!(options.allow_close_when_recording());
        assert!(options.start_recording_on_launch());
    }

    #[test]
    fn invalid_values_are_rejected_and_unchanged() {
        let mut options = Options::default();

        assert_eq!(
            options.set_sample_rate(12345),
            Err(OptionsError::UnsupportedSampleRate(12345))
        );
        assert_eq!(options.sample_rate(), 44100);

        assert!(options.set_channel_count(6).is_err());
        assert_eq!(options.channel_count(), 1);

        assert!(options.set_mp3_bit_rate(100).is_err());
        assert_eq!(options.mp3_bit_rate(), 96);

        assert!(options.set_max_recording_time_mins(7).is_err());
        assert_eq!(options.max_recording_time_mins(), 0);
    }

    #[test]
    fn destination_rejects_existing_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut options = Options::default();

        let err = options
            .set_destination_folder(Some(file.path().to_path_buf()))
            .unwrap_err();
        assert!(matches!(err, OptionsError::DestinationNotAFolder(_)));
        assert!(options.destination_folder().is_none());
    }

    #[test]
    fn empty_destination_resets_to_default() {
        let mut options = Options::default();
        options
            .set_destination_folder(Some(PathBuf::from("/recordings")))
            .unwrap();
        options.set_destination_folder(Some(PathBuf::new())).unwrap();
        assert!(options.destination_folder().is_none());
    }

    #[test]
    fn genre_is_trimmed() {
        let mut options = Options::default();
        options.set_genre("  Sermon  ");
        assert_eq!(options.genre(), "Sermon");
    }

    #[test]
    fn sanitize_resets_unsupported_values() {
        let mut options: Options = toml::from_str(
            r#"
sample_rate = 12345
channel_count = 8
mp3_bit_rate = 96
"#,
        )
        .unwrap();

        let reset = options.sanitize();
        assert_eq!(reset, vec![OptionKey::SampleRate, OptionKey::ChannelCount]);
        assert_eq!(options.sample_rate(), DEFAULT_SAMPLE_RATE);
        assert_eq!(options.channel_count(), DEFAULT_CHANNEL_COUNT);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let options: Options = toml::from_str("genre = \"Lecture\"").unwrap();
        assert_eq!(options.genre(), "Lecture");
        assert_eq!(options.sample_rate(), DEFAULT_SAMPLE_RATE);
        assert!(options.fade_out());
    }

    #[test]
    fn set_by_key_parses_values() {
        let mut options = Options::default();
        options.set_by_key(OptionKey::SampleRate, "22050").unwrap();
        options.set_by_key(OptionKey::FadeOut, "off").unwrap();
        options.set_by_key(OptionKey::Codec, "WAV").unwrap();

        assert_eq!(options.get_by_key(OptionKey::SampleRate).as_deref(), Some("22050"));
        assert_eq!(options.get_by_key(OptionKey::FadeOut).as_deref(), Some("false"));
        assert_eq!(options.get_by_key(OptionKey::Codec).as_deref(), Some("wav"));
        assert_eq!(options.get_by_key(OptionKey::DestinationFolder), None);
    }

    #[test]
    fn set_by_key_rejects_garbage() {
        let mut options = Options::default();
        assert!(matches!(
            options.set_by_key(OptionKey::SampleRate, "fast"),
            Err(OptionsError::InvalidValue { .. })
        ));
        assert!(matches!(
            options.set_by_key(OptionKey::AlwaysOnTop, "maybe"),
            Err(OptionsError::InvalidValue { .. })
        ));
        assert!(matches!(
            options.set_by_key(OptionKey::Codec, "flac"),
            Err(OptionsError::InvalidCodec(_))
        ));
    }

    #[test]
    fn option_key_parses_all_names() {
        for key in OptionKey::ALL {
            assert_eq!(key.as_str().parse::<OptionKey>().unwrap(), *key);
        }
        assert!(matches!(
            "volume".parse::<OptionKey>(),
            Err(OptionsError::UnknownKey(_))
        ));
    }
}
