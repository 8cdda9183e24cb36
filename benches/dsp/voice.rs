//! Benchmarks for tone voices mixing into device-sized blocks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use quantum_tones::dsp::OscillatorWaveform;
use quantum_tones::render::{ToneEvent, ToneVoice};

use crate::BLOCK_SIZES;

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/voice");
    let event = ToneEvent {
        waveform: OscillatorWaveform::Sine,
        frequency: 329.63,
        amplitude: 0.6,
        start: 0.0,
        duration: 3_600.0,
    };

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut voice = ToneVoice::new(&event, 44_100);
        let mut frame = 0u64;

        group.bench_with_input(BenchmarkId::new("render_into", size), &size, |b, _| {
            b.iter(|| {
                voice.render_into(black_box(&mut buffer), frame);
                frame = (frame + size as u64) % voice.end_frame();
            })
        });
    }

    group.finish();
}
