//! Sample-accurate tone voice shared by the offline and device renderers.
//!
//! A voice owns one oscillator and the absolute frame range it sounds in.
//! Callers render in blocks, passing the absolute frame number of each
//! block's first sample; the voice only touches the part of the block that
//! overlaps its range. Blocks must arrive in order for the phase to stay
//! continuous.

use super::event::ToneEvent;
use crate::dsp::OscillatorBlock;

/// Nearest frame to a time in seconds. Negative times clamp to frame 0.
#[inline]
pub fn seconds_to_frame(seconds: f64, sample_rate: u32) -> u64 {
    (seconds * sample_rate as f64).round().max(0.0) as u64
}

pub struct ToneVoice {
    osc: OscillatorBlock,
    amplitude: f32,
    start_frame: u64,
    end_frame: u64,
}

impl ToneVoice {
    pub fn new(event: &ToneEvent, sample_rate: u32) -> Self {
        Self {
            osc: OscillatorBlock::new(event.waveform, event.frequency, sample_rate as f32),
            amplitude: event.amplitude,
            start_frame: seconds_to_frame(event.start, sample_rate),
            end_frame: seconds_to_frame(event.end(), sample_rate),
        }
    }

    pub fn start_frame(&self) -> u64 {
        self.start_frame
    }

    pub fn end_frame(&self) -> u64 {
        self.end_frame
    }

    /// True once `frame` is at or past the last sample this voice writes.
    pub fn is_finished(&self, frame: u64) -> bool {
        frame >= self.end_frame
    }

    /// Mix this voice into `block`, whose first sample is absolute frame
    /// `block_start`.
    pub fn render_into(&mut self, block: &mut [f32], block_start: u64) {
        let block_end = block_start + block.len() as u64;
        let from = self.start_frame.max(block_start);
        let to = self.end_frame.min(block_end);
        if from >= to {
            return;
        }

        let lo = (from - block_start) as usize;
        let hi = (to - block_start) as usize;
        self.osc.render_add(&mut block[lo..hi], self.amplitude);
    }
}
