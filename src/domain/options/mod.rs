//! Recording options and the settings page's selection items

mod app_options;
pub mod items;

pub use app_options::{
    AudioCodec, OptionKey, Options, DEFAULT_CHANNEL_COUNT, DEFAULT_GENRE, DEFAULT_MP3_BIT_RATE,
    DEFAULT_SAMPLE_RATE,
};
pub use items::{
    BitRateItem, ChannelItem, MaxRecordingTimeItem, RecordingDeviceItem, SampleRateItem,
};
