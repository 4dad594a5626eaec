//! Recording infrastructure module
//!
//! Captures with cpal, resamples with rubato and encodes to WAV (hound) or
//! MP3 (LAME) on a dedicated capture thread.

mod cpal_service;
mod encoder;
mod fade;
mod resample;

pub use cpal_service::CpalAudioService;
pub use encoder::{create_encoder, FileEncoder, Mp3FileEncoder, WavFileEncoder};
pub use fade::{FadeOut, FADE_OUT_SECS};
pub use resample::StreamResampler;
