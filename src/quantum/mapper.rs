#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::oscillator::{QuantumState, Spin};
use crate::dsp::OscillatorWaveform;
use crate::session::ScheduledNote;
use crate::theory::{PitchClass, Scale};

/// Quietest velocity a mapped note can have.
pub const MIN_VELOCITY: f64 = 0.1;

/// A playable note: pitch, loudness and waveform.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub pitch: PitchClass,
    /// Linear gain, never below [`MIN_VELOCITY`]; no ceiling
    pub velocity: f64,
    pub timbre: OscillatorWaveform,
}

/// Scale index selected by a position value: `floor(position * len) mod len`.
pub fn position_to_index(position: f64, len: usize) -> usize {
    debug_assert!(len > 0);
    let raw = (position * len as f64).floor() as i64;
    raw.rem_euclid(len as i64) as usize
}

/// Nudge `index` one step up the scale if it would repeat `previous`.
///
/// Only a single step is taken. With `len >= 2` that always lands on a
/// different index; with `len == 1` there is nowhere else to go.
pub fn avoid_repeat(index: usize, len: usize, previous: Option<usize>) -> usize {
    match previous {
        Some(prev) if index % len == prev => (index + 1) % len,
        _ => index,
    }
}

pub fn spin_to_timbre(spin: Spin) -> OscillatorWaveform {
    match spin {
        Spin::Up => OscillatorWaveform::Sine,
        Spin::Down => OscillatorWaveform::Square,
    }
}

/// Turn a quantum state into a note from `scale`, steering away from the
/// pitch of the most recent note in `history`.
///
/// The previous pitch is looked up in the *current* scale; after a key
/// change it may not be a member, in which case nothing is avoided.
pub fn map_state_to_note(state: &QuantumState, scale: &Scale, history: &[ScheduledNote]) -> Note {
    let len = scale.len();
    let previous = history
        .last()
        .and_then(|last| scale.index_of(last.note.pitch));

    let index = avoid_repeat(position_to_index(state.position, len), len, previous);

    Note {
        pitch: scale.pitches()[index],
        velocity: state.momentum.max(MIN_VELOCITY),
        timbre: spin_to_timbre(state.spin),
    }
}
