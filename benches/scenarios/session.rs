//! Benchmarks for scheduling complete sessions.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use quantum_tones::rng::session_rng;
use quantum_tones::session::{schedule, SessionParams};

pub fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/session");

    for &bpm in &[60u32, 120, 480] {
        let params = SessionParams::default().bpm(bpm).duration_secs(60);
        group.bench_with_input(BenchmarkId::new("schedule_60s", bpm), &params, |b, &params| {
            let mut rng = session_rng(Some(1));
            b.iter(|| black_box(schedule(params, &mut rng)))
        });
    }

    group.finish();
}
