#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::Rng;

use crate::theory::PitchClass;

/// Chance per step that the session jumps to a new random key.
pub const DEFAULT_KEY_CHANGE_PROBABILITY: f64 = 0.01;

/// Stochastic modulation: after each note, roll once and maybe pick a new key.
///
/// The scale type never changes, and the new key is drawn uniformly from all
/// twelve, so it can land on the current key.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyChangeRule {
    pub probability: f64,
}

impl Default for KeyChangeRule {
    fn default() -> Self {
        Self {
            probability: DEFAULT_KEY_CHANGE_PROBABILITY,
        }
    }
}

impl KeyChangeRule {
    pub fn new(probability: f64) -> Self {
        Self { probability }
    }

    pub fn never() -> Self {
        Self::new(0.0)
    }

    /// Roll for a key change. Always consumes one draw; a second is taken
    /// only when the roll succeeds.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PitchClass> {
        if rng.gen::<f64>() < self.probability {
            Some(random_key(rng))
        } else {
            None
        }
    }
}

pub fn random_key<R: Rng + ?Sized>(rng: &mut R) -> PitchClass {
    PitchClass::ALL[rng.gen_range(0..PitchClass::ALL.len())]
}
