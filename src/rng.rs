//! Random source construction.
//!
//! Every random draw in a session (oscillator noise, spin, key changes) comes
//! from one `Pcg32` handed to the session, so a fixed seed reproduces a run
//! exactly.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates the session generator: seeded when `seed` is given, otherwise
/// seeded from OS entropy.
pub fn session_rng(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_entropy(),
    }
}
