//! Audio service backed by cpal
//!
//! Each recording runs on its own capture thread, which owns the cpal
//! stream (not `Send`), the resampler and the encoder. The service talks to
//! it through a stop channel and an atomic flag; the thread reports back on
//! the [`AudioEvent`] channel.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self as std_mpsc, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Datelike;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SampleRate, SizedSample, StreamConfig};
use id3::{Tag, TagLike, Version};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use super::encoder::{create_encoder, FileEncoder};
use super::fade::FadeOut;
use super::resample::StreamResampler;
use crate::application::ports::{
    AudioError, AudioEvent, AudioEventSender, AudioService, RecordingDeviceInfo,
};
use crate::domain::options::AudioCodec;
use crate::domain::recording::{RecordingCandidate, RecordingSettings};

/// How often progress is reported
const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
struct StopCommand {
    fade_out: bool,
}

#[derive(Default)]
struct Shared {
    recording: AtomicBool,
    stop: StdMutex<Option<std_mpsc::Sender<StopCommand>>>,
}

impl Shared {
    fn set_stop(&self, sender: Option<std_mpsc::Sender<StopCommand>>) {
        *self.stop.lock().unwrap_or_else(PoisonError::into_inner) = sender;
    }

    fn release(&self) {
        self.set_stop(None);
        self.recording.store(false, Ordering::SeqCst);
    }
}

/// cpal capture with WAV/MP3 encoding
pub struct CpalAudioService {
    events: AudioEventSender,
    shared: Arc<Shared>,
}

impl CpalAudioService {
    /// Events for every recording are published on `events`
    pub fn new(events: AudioEventSender) -> Self {
        Self {
            events,
            shared: Arc::new(Shared::default()),
        }
    }

    fn select_device(host: &cpal::Host, device_id: usize) -> Result<cpal::Device, AudioError> {
        let device = host
            .input_devices()
            .map_err(|e| AudioError::DeviceQueryFailed(e.to_string()))?
            .nth(device_id);

        match device {
            Some(device) => Ok(device),
            None => {
                warn!(device_id, "Recording device not found, using the default");
                host.default_input_device().ok_or(AudioError::NoAudioDevice)
            }
        }
    }

    /// Pick a supported input config, preferring one whose range contains
    /// the requested rate, then the requested channel count, then f32.
    fn input_config(
        device: &cpal::Device,
        sample_rate: u32,
        channels: u16,
    ) -> Result<(StreamConfig, SampleFormat), AudioError> {
        let supported = device
            .supported_input_configs()
            .map_err(|e| AudioError::StartFailed(format!("Failed to get configs: {}", e)))?;

        let includes_rate = |range: &cpal::SupportedStreamConfigRange| {
            range.min_sample_rate().0 <= sample_rate && range.max_sample_rate().0 >= sample_rate
        };

        let best = supported
            .filter(|range| {
                matches!(
                    range.sample_format(),
                    SampleFormat::I16 | SampleFormat::F32 | SampleFormat::U16
                )
            })
            .max_by_key(|range| {
                (
                    includes_rate(range),
                    range.channels() == channels,
                    range.sample_format() == SampleFormat::F32,
                )
            })
            .ok_or_else(|| AudioError::StartFailed("No suitable config found".into()))?;

        let rate = if includes_rate(&best) {
            SampleRate(sample_rate)
        } else if best.max_sample_rate().0 < sample_rate {
            best.max_sample_rate()
        } else {
            best.min_sample_rate()
        };

        let sample_format = best.sample_format();
        Ok((best.with_sample_rate(rate).config(), sample_format))
    }
}

#[async_trait]
impl AudioService for CpalAudioService {
    fn recording_devices(&self) -> Result<Vec<RecordingDeviceInfo>, AudioError> {
        let host = cpal::default_host();
        let default_name = host.default_input_device().and_then(|d| d.name().ok());

        let devices = host
            .input_devices()
            .map_err(|e| AudioError::DeviceQueryFailed(e.to_string()))?;

        Ok(devices
            .enumerate()
            .map(|(id, device)| {
                let name = device
                    .name()
                    .unwrap_or_else(|_| format!("Input device {}", id + 1));
                RecordingDeviceInfo {
                    id,
                    is_default: default_name.as_deref() == Some(name.as_str()),
                    name,
                }
            })
            .collect())
    }

    async fn start_recording(
        &self,
        candidate: RecordingCandidate,
        settings: RecordingSettings,
    ) -> Result<(), AudioError> {
        if self.shared.recording.swap(true, Ordering::SeqCst) {
            return Err(AudioError::AlreadyRecording);
        }

        let (stop_tx, stop_rx) = std_mpsc::channel();
        self.shared.set_stop(Some(stop_tx));

        let (ready_tx, ready_rx) = oneshot::channel();
        let worker = CaptureWorker {
            candidate,
            settings,
            events: self.events.clone(),
            stop: stop_rx,
            shared: Arc::clone(&self.shared),
        };

        let spawned = std::thread::Builder::new()
            .name("onlyr-capture".into())
            .spawn(move || worker.run(ready_tx));
        if let Err(e) = spawned {
            self.shared.release();
            return Err(AudioError::StartFailed(e.to_string()));
        }

        match ready_rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                self.shared.release();
                Err(AudioError::StartFailed("Capture thread exited".into()))
            }
        }
    }

    async fn stop_recording(&self, fade_out: bool) -> Result<(), AudioError> {
        let stop = self
            .shared
            .stop
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match stop.as_ref() {
            Some(sender) => sender
                .send(StopCommand { fade_out })
                .map_err(|_| AudioError::NotRecording),
            None => Err(AudioError::NotRecording),
        }
    }
}

/// State owned by the capture thread for one recording
struct CaptureWorker {
    candidate: RecordingCandidate,
    settings: RecordingSettings,
    events: AudioEventSender,
    stop: std_mpsc::Receiver<StopCommand>,
    shared: Arc<Shared>,
}

impl CaptureWorker {
    fn run(self, ready: oneshot::Sender<Result<(), AudioError>>) {
        let capture = match Capture::open(&self.candidate, &self.settings) {
            Ok(capture) => capture,
            Err(e) => {
                error!(error = %e, "Could not open audio capture");
                self.shared.release();
                let _ = ready.send(Err(e));
                return;
            }
        };

        let _ = ready.send(Ok(()));
        let _ = self.events.send(AudioEvent::Started);
        info!(device_rate = capture.device_rate, "Capture started");

        let result = self
            .record(capture)
            .and_then(|()| self.save())
            .inspect_err(|_| discard(&self.candidate.temp_path));

        self.shared.release();
        let _ = self.events.send(AudioEvent::Stopped(result));
    }

    fn record(&self, mut capture: Capture) -> Result<(), AudioError> {
        let started = Instant::now();
        let mut last_progress = started;
        let mut stop_requested = false;

        loop {
            match capture.samples.recv_timeout(PROGRESS_INTERVAL) {
                Ok(block) => capture.write_block(&block)?,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(AudioError::RecordingFailed("Audio stream closed".into()))
                }
            }

            if let Some(message) = capture.take_stream_error() {
                return Err(AudioError::RecordingFailed(message));
            }

            if capture.fade.as_ref().is_some_and(FadeOut::is_finished) {
                break;
            }

            match self.stop.try_recv() {
                Ok(StopCommand { fade_out: true }) if capture.fade.is_none() => {
                    debug!("Fading out");
                    capture.fade = Some(FadeOut::for_rate(self.settings.sample_rate));
                }
                Ok(_) | Err(TryRecvError::Disconnected) => break,
                Err(TryRecvError::Empty) => {}
            }

            if last_progress.elapsed() >= PROGRESS_INTERVAL {
                last_progress = Instant::now();
                let _ = self.events.send(AudioEvent::Progress {
                    elapsed_ms: started.elapsed().as_millis() as u64,
                    peak_level: std::mem::take(&mut capture.peak),
                });
            }

            if let Some(limit) = self.settings.max_recording_time {
                if !stop_requested && started.elapsed() >= limit {
                    info!(?limit, "Max recording time reached");
                    stop_requested = true;
                    let _ = self.events.send(AudioEvent::StopRequested);
                }
            }
        }

        capture.finish()
    }

    /// Tag the finished file and move it into place
    fn save(&self) -> Result<PathBuf, AudioError> {
        let temp = &self.candidate.temp_path;
        if self.settings.codec == AudioCodec::Mp3 {
            if let Err(e) = write_tag(temp, &self.candidate, &self.settings.genre) {
                warn!(error = %e, "Could not write MP3 tag");
            }
        }

        move_file(temp, &self.candidate.final_path)?;
        Ok(self.candidate.final_path.clone())
    }
}

/// An open cpal stream plus the processing chain behind it
struct Capture {
    stream: cpal::Stream,
    samples: std_mpsc::Receiver<Vec<f32>>,
    stream_error: Arc<StdMutex<Option<String>>>,
    device_rate: u32,
    device_channels: u16,
    target_channels: u16,
    resampler: StreamResampler,
    encoder: Box<dyn FileEncoder>,
    fade: Option<FadeOut>,
    peak: f32,
}

impl Capture {
    fn open(
        candidate: &RecordingCandidate,
        settings: &RecordingSettings,
    ) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = CpalAudioService::select_device(&host, settings.device_id)?;
        let (config, sample_format) =
            CpalAudioService::input_config(&device, settings.sample_rate, settings.channel_count)?;

        if let Some(parent) = candidate.temp_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AudioError::StartFailed(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let encoder = create_encoder(&candidate.temp_path, settings)?;
        let resampler = StreamResampler::new(
            config.sample_rate.0,
            settings.sample_rate,
            settings.channel_count as usize,
        )?;

        let (tx, samples) = std_mpsc::channel();
        let stream_error = Arc::new(StdMutex::new(None));
        let errors = Arc::clone(&stream_error);

        let stream = match sample_format {
            SampleFormat::I16 => build_stream::<i16>(&device, &config, tx, errors)?,
            SampleFormat::F32 => build_stream::<f32>(&device, &config, tx, errors)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, tx, errors)?,
            other => {
                return Err(AudioError::StartFailed(format!(
                    "Unsupported sample format {:?}",
                    other
                )))
            }
        };

        stream
            .play()
            .map_err(|e| AudioError::StartFailed(e.to_string()))?;

        debug!(
            device = %device.name().unwrap_or_default(),
            rate = config.sample_rate.0,
            channels = config.channels,
            ?sample_format,
            "Input stream open"
        );

        Ok(Self {
            stream,
            samples,
            stream_error,
            device_rate: config.sample_rate.0,
            device_channels: config.channels,
            target_channels: settings.channel_count,
            resampler,
            encoder,
            fade: None,
            peak: 0.0,
        })
    }

    fn write_block(&mut self, block: &[f32]) -> Result<(), AudioError> {
        let planar = mix_channels(block, self.device_channels, self.target_channels);
        let output = self.resampler.process(planar)?;
        self.write_output(output)
    }

    fn write_output(&mut self, mut output: Vec<Vec<f32>>) -> Result<(), AudioError> {
        if let Some(fade) = self.fade.as_mut() {
            fade.apply(&mut output);
        }
        self.peak = self.peak.max(peak_level(&output));
        self.encoder.write(&output)
    }

    fn take_stream_error(&self) -> Option<String> {
        self.stream_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Close the stream and flush the chain into the file
    fn finish(mut self) -> Result<(), AudioError> {
        self.stream.pause().ok();
        let tail = self.resampler.flush()?;
        self.write_output(tail)?;

        let Capture {
            stream, encoder, ..
        } = self;
        drop(stream);
        encoder.finish()
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    samples: std_mpsc::Sender<Vec<f32>>,
    errors: Arc<StdMutex<Option<String>>>,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let block: Vec<f32> = data.iter().map(|&s| f32::from_sample(s)).collect();
                let _ = samples.send(block);
            },
            move |err| {
                error!(error = %err, "Audio stream error");
                errors
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get_or_insert_with(|| err.to_string());
            },
            None,
        )
        .map_err(|e| AudioError::StartFailed(e.to_string()))
}

/// Split interleaved device frames into `target_channels` planar channels.
/// Mono output averages every device channel; otherwise device channels are
/// mapped in order, repeating the last one when the device has fewer.
fn mix_channels(interleaved: &[f32], device_channels: u16, target_channels: u16) -> Vec<Vec<f32>> {
    let device_channels = usize::from(device_channels.max(1));
    let target_channels = usize::from(target_channels.max(1));
    let frames = interleaved.len() / device_channels;

    let mut planar = vec![Vec::with_capacity(frames); target_channels];
    for frame in interleaved.chunks_exact(device_channels) {
        if target_channels == 1 {
            planar[0].push(frame.iter().sum::<f32>() / device_channels as f32);
        } else {
            for (c, channel) in planar.iter_mut().enumerate() {
                channel.push(frame[c.min(device_channels - 1)]);
            }
        }
    }
    planar
}

/// Peak absolute amplitude, 0.0..=1.0
fn peak_level(channels: &[Vec<f32>]) -> f32 {
    channels
        .iter()
        .flatten()
        .fold(0.0f32, |peak, s| peak.max(s.abs()))
        .min(1.0)
}

fn write_tag(path: &Path, candidate: &RecordingCandidate, genre: &str) -> Result<(), id3::Error> {
    let date = candidate.recording_date;
    let mut tag = Tag::new();
    tag.set_title(candidate.title());
    tag.set_album(format!("OnlyR {}", date.format("%Y-%m-%d")));
    tag.set_genre(genre);
    tag.set_year(date.year());
    tag.set_track(candidate.track_number);
    tag.write_to_path(path, Version::Id3v24)
}

/// Rename, falling back to copy + delete across filesystems
fn move_file(from: &Path, to: &Path) -> Result<(), AudioError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AudioError::SaveFailed(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to).map_err(|e| {
        AudioError::SaveFailed(format!("Failed to move recording to {}: {}", to.display(), e))
    })?;
    discard(from);
    Ok(())
}

fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Could not remove temp file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    fn candidate(dir: &Path) -> RecordingCandidate {
        RecordingCandidate {
            recording_date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            track_number: 3,
            temp_path: dir.join("tmp/2024-03-07 - 003.mp3"),
            final_path: dir.join("rec/2024-03/2024-03-07/2024-03-07 - 003.mp3"),
        }
    }

    #[test]
    fn mix_stereo_to_mono_averages() {
        let planar = mix_channels(&[0.2, 0.4, -1.0, 0.0], 2, 1);
        assert_eq!(planar.len(), 1);
        assert!((planar[0][0] - 0.3).abs() < 1e-6);
        assert!((planar[0][1] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn mix_mono_to_stereo_duplicates() {
        assert_eq!(
            mix_channels(&[0.1, 0.2], 1, 2),
            vec![vec![0.1, 0.2], vec![0.1, 0.2]]
        );
    }

    #[test]
    fn mix_drops_extra_device_channels() {
        let planar = mix_channels(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        assert_eq!(planar, vec![vec![1.0, 4.0], vec![2.0, 5.0]]);
    }

    #[test]
    fn peak_is_absolute_and_clamped() {
        assert_eq!(peak_level(&[vec![0.1, -0.6], vec![0.3]]), 0.6);
        assert_eq!(peak_level(&[vec![1.7]]), 1.0);
        assert_eq!(peak_level(&[]), 0.0);
    }

    #[test]
    fn tagged_file_is_moved_into_place() {
        let dir = TempDir::new().unwrap();
        let candidate = candidate(dir.path());
        fs::create_dir_all(candidate.temp_path.parent().unwrap()).unwrap();
        fs::write(&candidate.temp_path, b"not really audio").unwrap();

        write_tag(&candidate.temp_path, &candidate, "Speech").unwrap();
        move_file(&candidate.temp_path, &candidate.final_path).unwrap();

        assert!(!candidate.temp_path.exists());
        let tag = Tag::read_from_path(&candidate.final_path).unwrap();
        assert_eq!(tag.title(), Some("2024-03-07 - Track 3"));
        assert_eq!(tag.genre(), Some("Speech"));
        assert_eq!(tag.track(), Some(3));
    }

    #[tokio::test]
    async fn idle_service_rejects_stop() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let service = CpalAudioService::new(tx);

        assert_eq!(
            service.stop_recording(true).await,
            Err(AudioError::NotRecording)
        );
    }
}
