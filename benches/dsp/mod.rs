//! Benchmarks for low-level DSP primitives.

mod oscillator;
mod voice;

pub use oscillator::bench_oscillator;
pub use voice::bench_voice;
