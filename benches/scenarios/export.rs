//! Benchmarks for offline rendering and WAV encoding of a session.

use std::hint::black_box;

use criterion::Criterion;
use quantum_tones::io::encode_wav;
use quantum_tones::render::{tone_events, OfflineRenderer};
use quantum_tones::rng::session_rng;
use quantum_tones::session::{schedule, SessionParams};

pub fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/export");
    group.sample_size(10);

    let params = SessionParams::default().bpm(120).duration_secs(10);
    let session = schedule(params, &mut session_rng(Some(1))).expect("valid params");
    let events = tone_events(session.notes());
    let renderer = OfflineRenderer::default();

    group.bench_function("render_10s", |b| {
        b.iter(|| black_box(renderer.render_blocking(&events, session.end_time())))
    });

    let buffer = renderer
        .render_blocking(&events, session.end_time())
        .expect("render succeeds");
    group.bench_function("encode_10s", |b| b.iter(|| black_box(encode_wav(&buffer).unwrap())));

    group.finish();
}
