//! Realtime renderer - tones through the default output device
//!
//! Notes are scheduled up front: [`DeviceOutput::schedule_tone`] pushes each
//! event into a lock-free ring and returns immediately. The cpal callback
//! counts frames since the stream started and admits an event once its start
//! frame falls inside the block being rendered, so every tone starts
//! sample-accurately against the device clock. Rendering uses the same
//! [`ToneVoice`] as the offline path; the mono result is copied to every
//! device channel.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, Producer, PushError, RingBuffer};
use thiserror::Error;
use tracing::{info, warn};

use super::event::{ToneEvent, ToneSink};
use super::voice::ToneVoice;
use crate::MAX_BLOCK_SIZE;

/// Most tones the callback will sound at once. Sessions are monophonic, so
/// at most two overlap at a note boundary.
const MAX_ACTIVE_TONES: usize = 16;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("no default output device available")]
    NoOutputDevice,

    #[error("failed to fetch default output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// Audio-thread side: pulls due events and renders them block by block.
struct DevicePlayback {
    rx: Consumer<ToneEvent>,
    voices: Vec<ToneVoice>,
    render_buf: Vec<f32>,
    frame: u64,
    sample_rate: u32,
    clock: Arc<AtomicU64>,
    /// Tones refused because every voice slot was busy
    voice_overflow: Arc<AtomicUsize>,
}

impl DevicePlayback {
    fn new(
        rx: Consumer<ToneEvent>,
        sample_rate: u32,
        clock: Arc<AtomicU64>,
        voice_overflow: Arc<AtomicUsize>,
    ) -> Self {
        Self {
            rx,
            voices: Vec::with_capacity(MAX_ACTIVE_TONES),
            render_buf: vec![0.0; MAX_BLOCK_SIZE],
            frame: 0,
            sample_rate,
            clock,
            voice_overflow,
        }
    }

    /// Fill one interleaved device buffer.
    fn process(&mut self, data: &mut [f32], channels: usize) {
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            let block_start = self.frame;
            let block_end = block_start + frames_to_render as u64;

            // Admit every event that starts before this block ends
            while let Ok(event) = self.rx.peek() {
                let voice = ToneVoice::new(event, self.sample_rate);
                if voice.start_frame() >= block_end {
                    break;
                }
                let _ = self.rx.pop();
                if self.voices.len() < MAX_ACTIVE_TONES {
                    self.voices.push(voice);
                } else {
                    self.voice_overflow.fetch_add(1, Ordering::Relaxed);
                }
            }

            let block = &mut self.render_buf[..frames_to_render];
            block.fill(0.0);
            for voice in &mut self.voices {
                voice.render_into(block, block_start);
            }
            self.voices.retain(|v| !v.is_finished(block_end));

            // Copy to output (mono to all channels)
            let out_off = frames_written * channels;
            for (i, &s) in block.iter().enumerate() {
                for ch in 0..channels {
                    data[out_off + i * channels + ch] = s;
                }
            }

            frames_written += frames_to_render;
            self.frame = block_end;
        }

        self.clock.store(self.frame, Ordering::Relaxed);
    }
}

/// A running output stream that accepts tone events.
pub struct DeviceOutput {
    tx: Producer<ToneEvent>,
    clock: Arc<AtomicU64>,
    sample_rate: u32,
    channels: usize,
    dropped: usize,
    voice_overflow: Arc<AtomicUsize>,
    _stream: cpal::Stream,
}

impl DeviceOutput {
    /// Open the default output device with room for `capacity` pending tones.
    pub fn open(capacity: usize) -> Result<Self, DeviceError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(DeviceError::NoOutputDevice)?;
        let config = device.default_output_config()?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        let name = device.name().unwrap_or_default();
        info!(device = %name, sample_rate, channels, "opening output device");

        let (tx, rx) = RingBuffer::<ToneEvent>::new(capacity.max(1));
        let clock = Arc::new(AtomicU64::new(0));
        let voice_overflow = Arc::new(AtomicUsize::new(0));
        let mut playback =
            DevicePlayback::new(rx, sample_rate, clock.clone(), voice_overflow.clone());

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| playback.process(data, channels),
            |err| warn!(%err, "output stream error"),
            None,
        )?;
        stream.play()?;

        Ok(Self {
            tx,
            clock,
            sample_rate,
            channels,
            dropped: 0,
            voice_overflow,
            _stream: stream,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Seconds of audio the device has consumed since the stream started.
    pub fn elapsed_secs(&self) -> f64 {
        self.clock.load(Ordering::Relaxed) as f64 / self.sample_rate as f64
    }

    /// Tones that were never sounded: the queue was full when they were
    /// scheduled, or every voice was busy when they came due.
    pub fn dropped(&self) -> usize {
        self.dropped + self.voice_overflow.load(Ordering::Relaxed)
    }

    /// Sleep until the device clock passes `seconds`, giving up if the
    /// stream stalls for `seconds` plus a two second grace period.
    pub fn wait_until(&self, seconds: f64) {
        let deadline = Instant::now() + Duration::from_secs_f64(seconds.max(0.0) + 2.0);
        while self.elapsed_secs() < seconds {
            if Instant::now() >= deadline {
                warn!(elapsed = self.elapsed_secs(), "output stream stalled");
                break;
            }
            thread::sleep(Duration::from_millis(50));
        }

        let overflow = self.voice_overflow.load(Ordering::Relaxed);
        if overflow > 0 {
            warn!(overflow, "tones dropped, all voices busy");
        }
    }
}

impl ToneSink for DeviceOutput {
    fn schedule_tone(&mut self, event: ToneEvent) {
        if let Err(PushError::Full(event)) = self.tx.push(event) {
            self.dropped += 1;
            warn!(start = event.start, "tone queue full, dropping tone");
        }
    }
}
