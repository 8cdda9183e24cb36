//! Low-level DSP primitives used by the renderers.
//!
//! These components are allocation-free and realtime-safe, so the device
//! callback can run them directly.

/// Sine and square oscillators.
pub mod oscillator;

pub use oscillator::{OscillatorBlock, OscillatorWaveform};
