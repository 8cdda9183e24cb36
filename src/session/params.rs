#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use tracing::warn;

use super::key_change::KeyChangeRule;
use crate::error::SessionError;
use crate::theory::{PitchClass, Scale, ScaleType};

/// Most notes a single session may schedule.
pub const MAX_SESSION_NOTES: u64 = 1_000_000;

/// Inputs for one generation run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionParams {
    pub key: PitchClass,
    pub scale_type: ScaleType,
    /// Tempo; one note per beat
    pub bpm: u32,
    /// Length of the session in whole seconds
    pub duration_secs: u32,
    pub key_change: KeyChangeRule,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            key: PitchClass::C,
            scale_type: ScaleType::Major,
            bpm: 120,
            duration_secs: 10,
            key_change: KeyChangeRule::default(),
        }
    }
}

impl SessionParams {
    pub fn new(key: PitchClass, scale_type: ScaleType, bpm: u32, duration_secs: u32) -> Self {
        Self {
            key,
            scale_type,
            bpm,
            duration_secs,
            ..Self::default()
        }
    }

    /// Build params from symbolic key and scale names.
    ///
    /// An unrecognised key or scale name degrades the pair to C major.
    pub fn from_names(key: &str, scale_type: &str, bpm: u32, duration_secs: u32) -> Self {
        let (key, scale_type) = match (PitchClass::from_name(key), ScaleType::from_name(scale_type)) {
            (Some(key), Some(scale_type)) => (key, scale_type),
            _ => {
                warn!(key, scale_type, "unknown key or scale, falling back to C major");
                (PitchClass::C, ScaleType::Major)
            }
        };
        Self::new(key, scale_type, bpm, duration_secs)
    }

    pub fn key(mut self, key: PitchClass) -> Self {
        self.key = key;
        self
    }

    pub fn scale_type(mut self, scale_type: ScaleType) -> Self {
        self.scale_type = scale_type;
        self
    }

    pub fn bpm(mut self, bpm: u32) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn duration_secs(mut self, duration_secs: u32) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    pub fn key_change(mut self, rule: KeyChangeRule) -> Self {
        self.key_change = rule;
        self
    }

    /// Reject tempos and durations that cannot produce a finite schedule.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.bpm == 0 {
            return Err(SessionError::InvalidBpm { bpm: self.bpm });
        }
        if self.duration_secs == 0 {
            return Err(SessionError::InvalidDuration {
                seconds: self.duration_secs,
            });
        }
        let notes = self.beat_count();
        if notes > MAX_SESSION_NOTES {
            return Err(SessionError::TooManyNotes {
                notes,
                max: MAX_SESSION_NOTES,
            });
        }
        Ok(())
    }

    /// Seconds between note onsets (and the length of each note).
    pub fn note_interval(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    pub fn initial_scale(&self) -> Scale {
        Scale::new(self.key, self.scale_type)
    }

    /// Onset of beat `step` in seconds, rounded once from the exact
    /// `step * 60 / bpm`.
    pub fn beat_time(&self, step: usize) -> f64 {
        step as f64 * 60.0 / self.bpm as f64
    }

    /// Number of beats that start before the end: `ceil(duration * bpm / 60)`.
    pub fn beat_count(&self) -> u64 {
        (self.duration_secs as u64 * self.bpm as u64).div_ceil(60)
    }

    pub fn expected_note_count(&self) -> usize {
        usize::try_from(self.beat_count()).unwrap_or(usize::MAX)
    }
}
