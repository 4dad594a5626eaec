//! Linear fade-out applied to the tail of a recording

/// Length of the fade applied when a stop asks for one
pub const FADE_OUT_SECS: u32 = 1;

/// Linear gain ramp from 1.0 down to 0.0 over a fixed number of frames
#[derive(Debug, Clone)]
pub struct FadeOut {
    total_frames: usize,
    remaining: usize,
}

impl FadeOut {
    pub fn new(total_frames: usize) -> Self {
        Self {
            total_frames,
            remaining: total_frames,
        }
    }

    /// Fade of [`FADE_OUT_SECS`] at `sample_rate`
    pub fn for_rate(sample_rate: u32) -> Self {
        Self::new((sample_rate * FADE_OUT_SECS) as usize)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    /// Scale planar frames in place. Frames past the end of the fade are
    /// silenced.
    pub fn apply(&mut self, channels: &mut [Vec<f32>]) {
        let frames = channels.first().map_or(0, Vec::len);
        for i in 0..frames {
            let gain = self.next_gain();
            for channel in channels.iter_mut() {
                channel[i] *= gain;
            }
        }
    }

    fn next_gain(&mut self) -> f32 {
        if self.remaining == 0 || self.total_frames == 0 {
            self.remaining = 0;
            return 0.0;
        }
        self.remaining -= 1;
        self.remaining as f32 / self.total_frames as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_decreases_monotonically_to_zero() {
        let mut fade = FadeOut::new(8);
        let mut channels = vec![vec![1.0f32; 10]];
        fade.apply(&mut channels);

        let gains = &channels[0];
        assert!(gains.windows(2).all(|w| w[1] <= w[0]));
        assert!(gains[0] < 1.0);
        assert_eq!(gains[7], 0.0);
        assert_eq!(gains[9], 0.0);
        assert!(fade.is_finished());
    }

    #[test]
    fn fade_spans_calls() {
        let mut fade = FadeOut::new(4);
        let mut first = vec![vec![1.0f32; 2], vec![1.0f32; 2]];
        let mut second = vec![vec![1.0f32; 2], vec![1.0f32; 2]];

        fade.apply(&mut first);
        assert!(!fade.is_finished());
        fade.apply(&mut second);
        assert!(fade.is_finished());

        assert_eq!(first[0], vec![0.75, 0.5]);
        assert_eq!(first[1], first[0]);
        assert_eq!(second[0], vec![0.25, 0.0]);
    }

    #[test]
    fn one_second_at_rate() {
        let fade = FadeOut::for_rate(16000);
        assert_eq!(fade.total_frames, 16000);
    }
}
