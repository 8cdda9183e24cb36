#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;

/// A4 tuning reference in Hz.
pub const A4_FREQUENCY: f32 = 440.0;

/// One of the twelve equal-tempered pitch names, ordered chromatically from C.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order starting at C.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Position in the chromatic scale (C = 0, B = 11)
    pub fn semitone(self) -> u8 {
        self as u8
    }

    pub fn from_semitone(semitone: u8) -> PitchClass {
        Self::ALL[(semitone % 12) as usize]
    }

    /// Symbolic name using sharps, e.g. `"F#"`.
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Parse a symbolic name (`"C"`, `"F#"`, ...). Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<PitchClass> {
        Self::ALL.into_iter().find(|pitch| pitch.name() == name.trim())
    }

    /// Frequency of this pitch in octave 4.
    pub fn frequency(self) -> f32 {
        semitone_to_frequency(self.semitone())
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Equal-tempered frequency of a semitone index in octave 4 (A = 9 = 440 Hz).
#[inline]
fn semitone_to_frequency(semitone: u8) -> f32 {
    A4_FREQUENCY * 2.0_f32.powf((semitone as f32 - 9.0) / 12.0)
}

/// Convert a pitch name to its octave-4 frequency.
///
/// Names that are not one of the twelve pitch classes fall back to A4 rather
/// than failing.
pub fn note_to_frequency(name: &str) -> f32 {
    PitchClass::from_name(name)
        .map(PitchClass::frequency)
        .unwrap_or(A4_FREQUENCY)
}
