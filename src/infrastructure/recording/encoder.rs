//! File encoders for the recording worker
//!
//! Both encoders take planar f32 frames at the recording rate and channel
//! count, and write straight to the temp file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::debug;

use crate::application::ports::AudioError;
use crate::domain::options::AudioCodec;
use crate::domain::recording::RecordingSettings;

/// Sink for encoded audio
pub trait FileEncoder {
    /// Encode planar frames
    fn write(&mut self, channels: &[Vec<f32>]) -> Result<(), AudioError>;

    /// Flush and close the file
    fn finish(self: Box<Self>) -> Result<(), AudioError>;
}

/// Open the encoder matching `settings.codec` at `path`
pub fn create_encoder(
    path: &Path,
    settings: &RecordingSettings,
) -> Result<Box<dyn FileEncoder>, AudioError> {
    match settings.codec {
        AudioCodec::Wav => Ok(Box::new(WavFileEncoder::create(
            path,
            settings.sample_rate,
            settings.channel_count,
        )?)),
        AudioCodec::Mp3 => Ok(Box::new(Mp3FileEncoder::create(
            path,
            settings.sample_rate,
            settings.channel_count,
            settings.mp3_bit_rate,
        )?)),
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// 16-bit PCM WAV via hound
pub struct WavFileEncoder {
    writer: WavWriter<BufWriter<File>>,
}

impl WavFileEncoder {
    pub fn create(path: &Path, sample_rate: u32, channels: u16) -> Result<Self, AudioError> {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(path, spec)
            .map_err(|e| AudioError::StartFailed(format!("Failed to create WAV file: {}", e)))?;
        debug!(path = %path.display(), sample_rate, channels, "WAV encoder ready");
        Ok(Self { writer })
    }
}

impl FileEncoder for WavFileEncoder {
    fn write(&mut self, channels: &[Vec<f32>]) -> Result<(), AudioError> {
        let frames = channels.first().map_or(0, Vec::len);
        for i in 0..frames {
            for channel in channels {
                self.writer
                    .write_sample(to_i16(channel[i]))
                    .map_err(|e| AudioError::RecordingFailed(e.to_string()))?;
            }
        }
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<(), AudioError> {
        self.writer
            .finalize()
            .map_err(|e| AudioError::SaveFailed(e.to_string()))
    }
}

/// MP3 via LAME at a constant bit rate
pub struct Mp3FileEncoder {
    lame: lame::Lame,
    file: BufWriter<File>,
    buffer: Vec<u8>,
}

impl Mp3FileEncoder {
    pub fn create(
        path: &Path,
        sample_rate: u32,
        channels: u16,
        bit_rate: u32,
    ) -> Result<Self, AudioError> {
        let mut lame = lame::Lame::new()
            .ok_or_else(|| AudioError::StartFailed("Failed to create LAME encoder".into()))?;

        lame.set_channels(channels as u8)
            .map_err(|e| AudioError::StartFailed(format!("LAME channels: {:?}", e)))?;
        lame.set_sample_rate(sample_rate)
            .map_err(|e| AudioError::StartFailed(format!("LAME sample rate: {:?}", e)))?;
        lame.set_kilobitrate(bit_rate as i32)
            .map_err(|e| AudioError::StartFailed(format!("LAME bit rate: {:?}", e)))?;
        lame.set_quality(2)
            .map_err(|e| AudioError::StartFailed(format!("LAME quality: {:?}", e)))?;
        lame.init_params()
            .map_err(|e| AudioError::StartFailed(format!("LAME init: {:?}", e)))?;

        let file = File::create(path)
            .map_err(|e| AudioError::StartFailed(format!("Failed to create MP3 file: {}", e)))?;

        debug!(path = %path.display(), sample_rate, channels, bit_rate, "MP3 encoder ready");
        Ok(Self {
            lame,
            file: BufWriter::new(file),
            buffer: Vec::new(),
        })
    }
}

impl FileEncoder for Mp3FileEncoder {
    fn write(&mut self, channels: &[Vec<f32>]) -> Result<(), AudioError> {
        let Some(first) = channels.first() else {
            return Ok(());
        };
        if first.is_empty() {
            return Ok(());
        }

        let left: Vec<i16> = first.iter().copied().map(to_i16).collect();
        // LAME wants equal-length inputs and ignores the right one in mono
        let right: Vec<i16> = match channels.get(1) {
            Some(channel) => channel.iter().copied().map(to_i16).collect(),
            None => left.clone(),
        };

        // Worst case from lame.h: 1.25 * samples + 7200
        self.buffer.resize(left.len() * 5 / 4 + 7200, 0);
        let written = self
            .lame
            .encode(&left, &right, &mut self.buffer)
            .map_err(|e| AudioError::RecordingFailed(format!("LAME encode: {:?}", e)))?;

        self.file
            .write_all(&self.buffer[..written])
            .map_err(|e| AudioError::RecordingFailed(e.to_string()))
    }

    fn finish(mut self: Box<Self>) -> Result<(), AudioError> {
        // The lame crate exposes no flush; the last partial frame is dropped
        self.file
            .flush()
            .map_err(|e| AudioError::SaveFailed(e.to_string()))
    }
}
