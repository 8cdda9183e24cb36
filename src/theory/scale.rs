/*
Diatonic Scales
===============

Every scale here is seven notes taken from the twelve-tone chromatic circle,
built by stacking a fixed interval pattern on top of a key (tonic):

  major          0  2  4  5  7  9  11    (W W H W W W H)
  natural minor  0  2  3  5  7  8  10    (W H W W H W W)

So C major is C D E F G A B, and A minor is A B C D E F G: same pitches,
different starting point. Spellings always use sharps, which means F major
contains A# rather than Bb.

The pitch order matters. The note mapper picks notes by index into this
sequence, so index 0 is always the tonic and the list wraps around the
octave (B major ends on A#, not on the B above).
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;

use super::pitch::PitchClass;

/// Number of pitches in every scale produced by this module.
pub const SCALE_LEN: usize = 7;

const MAJOR_STEPS: [u8; SCALE_LEN] = [0, 2, 4, 5, 7, 9, 11];
const MINOR_STEPS: [u8; SCALE_LEN] = [0, 2, 3, 5, 7, 8, 10];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScaleType {
    #[default]
    Major,
    Minor,
}

impl ScaleType {
    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "major",
            ScaleType::Minor => "minor",
        }
    }

    /// Parse `"major"` or `"minor"` (case-insensitive).
    pub fn from_name(name: &str) -> Option<ScaleType> {
        match name.trim().to_ascii_lowercase().as_str() {
            "major" => Some(ScaleType::Major),
            "minor" => Some(ScaleType::Minor),
            _ => None,
        }
    }

    fn steps(self) -> &'static [u8; SCALE_LEN] {
        match self {
            ScaleType::Major => &MAJOR_STEPS,
            ScaleType::Minor => &MINOR_STEPS,
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered seven-note scale rooted at `key`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    key: PitchClass,
    scale_type: ScaleType,
    pitches: [PitchClass; SCALE_LEN],
}

impl Scale {
    pub fn new(key: PitchClass, scale_type: ScaleType) -> Self {
        let root = key.semitone();
        let pitches = scale_type
            .steps()
            .map(|step| PitchClass::from_semitone(root + step));

        Self {
            key,
            scale_type,
            pitches,
        }
    }

    pub fn key(&self) -> PitchClass {
        self.key
    }

    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    pub fn pitches(&self) -> &[PitchClass] {
        &self.pitches
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    /// Index of `pitch` within this scale, if it belongs to it.
    pub fn index_of(&self, pitch: PitchClass) -> Option<usize> {
        self.pitches.iter().position(|&p| p == pitch)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::new(PitchClass::C, ScaleType::Major)
    }
}

/// Lookup from symbolic (key, scale type) names to a scale.
pub struct ScaleTable;

impl ScaleTable {
    /// Resolve a key name and scale-type name to a scale.
    ///
    /// If either name is not recognised the whole pair degrades to C major;
    /// this never fails.
    pub fn resolve(key: &str, scale_type: &str) -> Scale {
        match (PitchClass::from_name(key), ScaleType::from_name(scale_type)) {
            (Some(key), Some(scale_type)) => Scale::new(key, scale_type),
            _ => Scale::default(),
        }
    }
}
