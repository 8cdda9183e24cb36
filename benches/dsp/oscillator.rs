//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use quantum_tones::dsp::OscillatorBlock;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - uses sin() transcendental function
        let mut osc = OscillatorBlock::sine(440.0, 44_100.0);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });

        // Square - branch per sample
        let mut osc = OscillatorBlock::square(440.0, 44_100.0);
        group.bench_with_input(BenchmarkId::new("square", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer));
            })
        });

        let mut osc = OscillatorBlock::sine(440.0, 44_100.0);
        group.bench_with_input(BenchmarkId::new("sine_add", size), &size, |b, _| {
            b.iter(|| {
                osc.render_add(black_box(&mut buffer), 0.5);
            })
        });
    }

    group.finish();
}
