#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f64::consts::TAU;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OscillatorWaveform {
    Sine,
    Square,
}

/// Phase-accumulating oscillator.
///
/// Phase is kept in cycles (0.0..1.0) as f64 so long notes don't drift.
/// The first rendered sample is at phase 0, so a sine starts at zero and a
/// square starts high.
#[derive(Debug, Clone)]
pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f64,
    phase_inc: f64,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform, frequency: f32, sample_rate: f32) -> Self {
        Self {
            waveform,
            phase: 0.0,
            phase_inc: frequency as f64 / sample_rate as f64,
        }
    }

    pub fn sine(frequency: f32, sample_rate: f32) -> Self {
        Self::new(OscillatorWaveform::Sine, frequency, sample_rate)
    }

    pub fn square(frequency: f32, sample_rate: f32) -> Self {
        Self::new(OscillatorWaveform::Square, frequency, sample_rate)
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    #[inline]
    fn next_sample(&mut self) -> f32 {
        let sample = match self.waveform {
            OscillatorWaveform::Sine => (TAU * self.phase).sin() as f32,
            OscillatorWaveform::Square => {
                if self.phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }
        sample
    }

    /// Overwrite `out` with oscillator output.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Add `gain`-scaled oscillator output on top of whatever is in `out`.
    pub fn render_add(&mut self, out: &mut [f32], gain: f32) {
        for sample in out.iter_mut() {
            *sample += self.next_sample() * gain;
        }
    }
}
