//! Offline renderer - tone events straight into a fixed-length buffer
//!
//! Rendering happens on a worker thread. [`RenderJob::wait`] is the single
//! completion point: it yields either the finished buffer or the reason the
//! render failed, and nothing partial is ever handed out.

use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use super::event::ToneEvent;
use super::voice::ToneVoice;
use crate::error::RenderError;
use crate::io::AudioBuffer;

pub const SAMPLE_RATE: u32 = 44_100;
pub const CHANNELS: usize = 2;
/// Longest render accepted, in seconds.
pub const MAX_RENDER_SECONDS: u64 = 3_600;

/// Something that can render a batch of tone events into a buffer.
pub trait OfflineRender {
    /// Start rendering `events` into a buffer `duration_secs` long.
    fn start_rendering(&self, events: Vec<ToneEvent>, duration_secs: f64) -> RenderJob;
}

/// An in-flight render.
pub struct RenderJob {
    handle: JoinHandle<Result<AudioBuffer, RenderError>>,
}

impl RenderJob {
    /// Run `work` on a new thread.
    pub fn spawn<F>(work: F) -> Self
    where
        F: FnOnce() -> Result<AudioBuffer, RenderError> + Send + 'static,
    {
        Self {
            handle: thread::spawn(work),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the render completes.
    pub fn wait(self) -> Result<AudioBuffer, RenderError> {
        self.handle.join().unwrap_or(Err(RenderError::Panicked))
    }
}

/// Stereo renderer at a fixed sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfflineRenderer {
    sample_rate: u32,
    channels: usize,
    max_frames: u64,
}

impl Default for OfflineRenderer {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            channels: CHANNELS,
            max_frames: SAMPLE_RATE as u64 * MAX_RENDER_SECONDS,
        }
    }
}

impl OfflineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the frame limit.
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Buffer length for a duration: `ceil(seconds * sample_rate)`.
    pub fn frames_for(&self, duration_secs: f64) -> u64 {
        (duration_secs.max(0.0) * self.sample_rate as f64).ceil() as u64
    }

    /// Render on the calling thread.
    pub fn render_blocking(
        &self,
        events: &[ToneEvent],
        duration_secs: f64,
    ) -> Result<AudioBuffer, RenderError> {
        if events.is_empty() {
            return Err(RenderError::EmptyTimeline);
        }

        let frames = self.frames_for(duration_secs);
        if frames > self.max_frames {
            return Err(RenderError::TooLong {
                frames,
                max: self.max_frames,
            });
        }

        info!(
            events = events.len(),
            frames,
            sample_rate = self.sample_rate,
            "rendering offline"
        );

        let mut mono = alloc_zeroed(frames)?;
        for event in events {
            ToneVoice::new(event, self.sample_rate).render_into(&mut mono, 0);
        }

        // Mono source, copied to every output channel
        let mut channels = Vec::with_capacity(self.channels);
        for _ in 1..self.channels {
            let mut copy = alloc_zeroed(frames)?;
            copy.copy_from_slice(&mono);
            channels.push(copy);
        }
        channels.push(mono);

        let buffer = AudioBuffer::from_channels(self.sample_rate, channels);
        debug!(peak = buffer.peak(), "offline render finished");
        Ok(buffer)
    }
}

impl OfflineRender for OfflineRenderer {
    fn start_rendering(&self, events: Vec<ToneEvent>, duration_secs: f64) -> RenderJob {
        let renderer = *self;
        RenderJob::spawn(move || renderer.render_blocking(&events, duration_secs))
    }
}

fn alloc_zeroed(frames: u64) -> Result<Vec<f32>, RenderError> {
    let len = usize::try_from(frames).map_err(|_| RenderError::Allocation { frames })?;
    let mut samples = Vec::new();
    samples
        .try_reserve_exact(len)
        .map_err(|_| RenderError::Allocation { frames })?;
    samples.resize(len, 0.0);
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::OscillatorWaveform;

    fn tone(waveform: OscillatorWaveform, start: f64, duration: f64, amplitude: f32) -> ToneEvent {
        ToneEvent {
            waveform,
            frequency: 440.0,
            amplitude,
            start,
            duration,
        }
    }

    #[test]
    fn buffer_length_rounds_up() {
        let renderer = OfflineRenderer::default();
        assert_eq!(renderer.frames_for(4.0), 176_400);
        assert_eq!(renderer.frames_for(0.00001), 1);
        assert_eq!(renderer.frames_for(0.0), 0);
    }

    #[test]
    fn renders_stereo_at_44_1k() {
        let events = vec![tone(OscillatorWaveform::Sine, 0.0, 0.5, 0.5)];
        let buffer = OfflineRenderer::default().render_blocking(&events, 1.0).unwrap();

        assert_eq!(buffer.sample_rate(), 44_100);
        assert_eq!(buffer.num_channels(), 2);
        assert_eq!(buffer.frames(), 44_100);
        assert_eq!(buffer.channel(0), buffer.channel(1));

        let left = buffer.channel(0).unwrap();
        assert!(left[..22_050].iter().any(|&s| s.abs() > 0.4));
        assert!(left[22_050..].iter().all(|&s| s == 0.0));
        assert!(buffer.peak() <= 0.5 + 1e-6);
    }

    #[test]
    fn notes_land_on_their_sample_offsets() {
        let events = vec![tone(OscillatorWaveform::Square, 0.25, 0.25, 0.3)];
        let buffer = OfflineRenderer::default().render_blocking(&events, 1.0).unwrap();
        let left = buffer.channel(0).unwrap();

        assert_eq!(left[11_024], 0.0);
        assert_eq!(left[11_025], 0.3);
        assert!((11_025..22_050).all(|i| left[i].abs() == 0.3));
        assert_eq!(left[22_050], 0.0);
    }

    #[test]
    fn events_past_the_end_are_cut_off() {
        let events = vec![tone(OscillatorWaveform::Square, 0.9, 0.5, 1.0)];
        let buffer = OfflineRenderer::default().render_blocking(&events, 1.0).unwrap();
        assert_eq!(buffer.frames(), 44_100);
        assert_eq!(buffer.channel(0).unwrap()[44_099].abs(), 1.0);
    }

    #[test]
    fn empty_timeline_is_refused() {
        let result = OfflineRenderer::default().render_blocking(&[], 1.0);
        assert_eq!(result, Err(RenderError::EmptyTimeline));
    }

    #[test]
    fn over_long_renders_are_refused() {
        let events = vec![tone(OscillatorWaveform::Sine, 0.0, 1.0, 1.0)];
        let result = OfflineRenderer::default()
            .with_max_frames(1_000)
            .render_blocking(&events, 1.0);
        assert_eq!(
            result,
            Err(RenderError::TooLong {
                frames: 44_100,
                max: 1_000
            })
        );
    }

    #[test]
    fn threaded_render_matches_blocking() {
        let renderer = OfflineRenderer::default();
        let events = vec![
            tone(OscillatorWaveform::Sine, 0.0, 0.1, 0.8),
            tone(OscillatorWaveform::Square, 0.1, 0.1, 0.2),
        ];

        let expected = renderer.render_blocking(&events, 0.2).unwrap();
        let actual = renderer.start_rendering(events, 0.2).wait().unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn panicking_worker_reports_failure() {
        let job = RenderJob::spawn(|| panic!("boom"));
        assert_eq!(job.wait(), Err(RenderError::Panicked));
    }
}
