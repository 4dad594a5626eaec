//! Streaming sample-rate conversion with rubato

use rubato::{FftFixedIn, Resampler};

use crate::application::ports::AudioError;

const CHUNK_SIZE: usize = 1024;
const SUB_CHUNKS: usize = 2;
const MAX_FLUSH_CHUNKS: usize = 8;

/// Converts planar audio from the device rate to the recording rate.
///
/// Input arrives in arbitrarily sized blocks; it is buffered until the
/// resampler has a full chunk. Equal rates pass straight through. The
/// resampler's output delay is dropped so output lines up with input.
pub struct StreamResampler {
    inner: Option<FftFixedIn<f32>>,
    pending: Vec<Vec<f32>>,
    ratio: f64,
    /// Leading output frames still to drop
    delay: usize,
    frames_in: usize,
    frames_out: usize,
}

impl StreamResampler {
    pub fn new(source_rate: u32, target_rate: u32, channels: usize) -> Result<Self, AudioError> {
        let inner = if source_rate == target_rate {
            None
        } else {
            Some(
                FftFixedIn::<f32>::new(
                    source_rate as usize,
                    target_rate as usize,
                    CHUNK_SIZE,
                    SUB_CHUNKS,
                    channels,
                )
                .map_err(|e| AudioError::StartFailed(format!("Resampler init failed: {}", e)))?,
            )
        };
        let delay = inner.as_ref().map_or(0, |r| r.output_delay());

        Ok(Self {
            inner,
            pending: vec![Vec::new(); channels],
            ratio: target_rate as f64 / source_rate as f64,
            delay,
            frames_in: 0,
            frames_out: 0,
        })
    }

    pub fn is_passthrough(&self) -> bool {
        self.inner.is_none()
    }

    /// Feed planar frames, returning whatever output is ready
    pub fn process(&mut self, input: Vec<Vec<f32>>) -> Result<Vec<Vec<f32>>, AudioError> {
        let Some(resampler) = self.inner.as_mut() else {
            return Ok(input);
        };

        self.frames_in += input.first().map_or(0, Vec::len);
        for (pending, channel) in self.pending.iter_mut().zip(input) {
            pending.extend(channel);
        }

        let mut output = vec![Vec::new(); self.pending.len()];
        loop {
            let needed = resampler.input_frames_next();
            if self.pending.first().map_or(0, Vec::len) < needed {
                break;
            }

            let chunk: Vec<Vec<f32>> = self
                .pending
                .iter_mut()
                .map(|channel| channel.drain(..needed).collect())
                .collect();

            let resampled = resampler
                .process(&chunk, None)
                .map_err(|e| AudioError::RecordingFailed(format!("Resampling failed: {}", e)))?;

            for (out, channel) in output.iter_mut().zip(resampled) {
                out.extend(channel);
            }
        }

        self.skip_delay(&mut output);
        self.frames_out += output.first().map_or(0, Vec::len);
        Ok(output)
    }

    /// Push out the buffered tail, padded with silence and trimmed to the
    /// expected output length
    pub fn flush(&mut self) -> Result<Vec<Vec<f32>>, AudioError> {
        let channels = self.pending.len();
        if self.inner.is_none() {
            return Ok(vec![Vec::new(); channels]);
        }

        let expected = (self.frames_in as f64 * self.ratio).ceil() as usize;
        let keep = expected.saturating_sub(self.frames_out);
        let mut output = vec![Vec::new(); channels];

        // Padded chunks until the delayed tail is out
        for _ in 0..MAX_FLUSH_CHUNKS {
            if output.first().map_or(0, Vec::len) >= keep {
                break;
            }
            let mut tail = self.process_padded_chunk()?;
            self.skip_delay(&mut tail);
            for (out, channel) in output.iter_mut().zip(tail) {
                out.extend(channel);
            }
        }

        for channel in output.iter_mut() {
            channel.truncate(keep);
        }
        self.frames_out += output.first().map_or(0, Vec::len);
        Ok(output)
    }

    fn process_padded_chunk(&mut self) -> Result<Vec<Vec<f32>>, AudioError> {
        let Some(resampler) = self.inner.as_mut() else {
            return Ok(vec![Vec::new(); self.pending.len()]);
        };

        let needed = resampler.input_frames_next();
        let chunk: Vec<Vec<f32>> = self
            .pending
            .iter_mut()
            .map(|channel| {
                let mut data: Vec<f32> = channel.drain(..).collect();
                data.resize(needed, 0.0);
                data
            })
            .collect();

        resampler
            .process(&chunk, None)
            .map_err(|e| AudioError::RecordingFailed(format!("Resampling failed: {}", e)))
    }

    fn skip_delay(&mut self, output: &mut [Vec<f32>]) {
        let skip = self.delay.min(output.first().map_or(0, Vec::len));
        if skip == 0 {
            return;
        }
        for channel in output.iter_mut() {
            channel.drain(..skip);
        }
        self.delay -= skip;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_rates_pass_through() {
        let mut resampler = StreamResampler::new(44100, 44100, 1).unwrap();
        assert!(resampler.is_passthrough());

        let out = resampler.process(vec![vec![0.1, 0.2, 0.3]]).unwrap();
        assert_eq!(out, vec![vec![0.1, 0.2, 0.3]]);
        assert_eq!(resampler.flush().unwrap(), vec![Vec::<f32>::new()]);
    }

    #[test]
    fn downsampling_produces_proportional_length() {
        let mut resampler = StreamResampler::new(48000, 16000, 2).unwrap();
        let mut total = 0;

        for _ in 0..10 {
            let block = vec![vec![0.0f32; 480], vec![0.0f32; 480]];
            let out = resampler.process(block).unwrap();
            assert_eq!(out[0].len(), out[1].len());
            total += out[0].len();
        }
        total += resampler.flush().unwrap()[0].len();

        assert_eq!(total, 1600);
    }

    #[test]
    fn output_lines_up_with_input() {
        let mut resampler = StreamResampler::new(48000, 16000, 1).unwrap();
        let mut output = Vec::new();

        for _ in 0..100 {
            output.extend(resampler.process(vec![vec![0.5f32; 480]]).unwrap().remove(0));
        }
        output.extend(resampler.flush().unwrap().remove(0));

        assert_eq!(output.len(), 16000);
        assert!(output[0] > 0.1, "leading filler: {}", output[0]);
        assert!(output[15999] > 0.1, "trailing audio cut: {}", output[15999]);
        assert!((output[8000] - 0.5).abs() < 0.01);
    }
}
