//! Whole-pipeline benchmarks.

mod export;
mod session;

pub use export::bench_export;
pub use session::bench_session;
