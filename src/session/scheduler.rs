//! Session scheduler - steps the oscillator through time and collects notes
//!
//! A session is a two-state machine:
//!
//! ```text
//!   Running --(current_time >= end_time)--> Complete
//! ```
//!
//! Each step samples one quantum state, maps it to a note, stamps it at the
//! current time, advances the clock by one beat and finally rolls for a key
//! change. Beats are counted in integers; onset times are derived from the
//! beat index so rounding never accumulates. The note history is append-only: a key change only affects notes
//! scheduled after it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::Rng;
use tracing::{debug, info};

use super::params::SessionParams;
use crate::error::SessionError;
use crate::quantum::{map_state_to_note, Note, QuantumStateGenerator, Spin};
use crate::theory::{PitchClass, Scale};

/// Notes reserved up front; longer sessions grow the history as they go.
const MAX_PREALLOCATED_NOTES: usize = 4096;

/// A note stamped with its onset, length and the state that produced it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledNote {
    pub note: Note,
    pub position: f64,
    pub momentum: f64,
    pub spin: Spin,
    /// Seconds from session start
    pub start_time: f64,
    /// Seconds
    pub duration: f64,
}

impl ScheduledNote {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// A key change that happened after the note at `step`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyChange {
    pub step: usize,
    pub time: f64,
    pub key: PitchClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Complete,
}

/// One generation run: parameters, clock, current scale and note history.
#[derive(Debug, Clone)]
pub struct Session {
    params: SessionParams,
    generator: QuantumStateGenerator,
    current_scale: Scale,
    current_time: f64,
    end_time: f64,
    total_beats: u64,
    notes: Vec<ScheduledNote>,
    key_changes: Vec<KeyChange>,
}

impl Session {
    /// Validate `params` and set up a session at t = 0.
    pub fn new(params: SessionParams) -> Result<Self, SessionError> {
        params.validate()?;

        Ok(Self {
            params,
            generator: QuantumStateGenerator::default(),
            current_scale: params.initial_scale(),
            current_time: 0.0,
            end_time: params.duration_secs as f64,
            total_beats: params.beat_count(),
            notes: Vec::with_capacity(params.expected_note_count().min(MAX_PREALLOCATED_NOTES)),
            key_changes: Vec::new(),
        })
    }

    /// Replace the oscillator model used for every step.
    pub fn with_generator(mut self, generator: QuantumStateGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn state(&self) -> SchedulerState {
        if (self.notes.len() as u64) < self.total_beats {
            SchedulerState::Running
        } else {
            SchedulerState::Complete
        }
    }

    /// Schedule one note. Returns `None` once the session is complete.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&ScheduledNote> {
        if self.state() == SchedulerState::Complete {
            return None;
        }

        let interval = self.params.note_interval();
        let step = self.notes.len();
        let state = self.generator.next(step, self.params.bpm, rng);
        let note = map_state_to_note(&state, &self.current_scale, &self.notes);

        debug!(
            step,
            pitch = %note.pitch,
            position = state.position,
            momentum = state.momentum,
            spin = ?state.spin,
            "scheduled note"
        );

        self.notes.push(ScheduledNote {
            note,
            position: state.position,
            momentum: state.momentum,
            spin: state.spin,
            start_time: self.current_time,
            duration: interval,
        });
        self.current_time = self.params.beat_time(self.notes.len());

        if let Some(key) = self.params.key_change.roll(rng) {
            info!(step, %key, "changing key");
            self.current_scale = Scale::new(key, self.params.scale_type);
            self.key_changes.push(KeyChange {
                step,
                time: self.current_time,
                key,
            });
        }

        self.notes.last()
    }

    /// Run to completion, handing each note to `on_note` as it is scheduled.
    pub fn run_with<R, F>(mut self, rng: &mut R, mut on_note: F) -> Self
    where
        R: Rng + ?Sized,
        F: FnMut(&ScheduledNote),
    {
        while let Some(note) = self.step(rng) {
            on_note(note);
        }

        info!(
            notes = self.notes.len(),
            key_changes = self.key_changes.len(),
            "session complete"
        );
        self
    }

    pub fn run<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        self.run_with(rng, |_| {})
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    /// Scheduled notes in onset order.
    pub fn notes(&self) -> &[ScheduledNote] {
        &self.notes
    }

    pub fn into_notes(self) -> Vec<ScheduledNote> {
        self.notes
    }

    pub fn key_changes(&self) -> &[KeyChange] {
        &self.key_changes
    }

    pub fn current_scale(&self) -> &Scale {
        &self.current_scale
    }

    pub fn current_key(&self) -> PitchClass {
        self.current_scale.key()
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn note_interval(&self) -> f64 {
        self.params.note_interval()
    }
}

/// Validate `params` and schedule a complete session.
pub fn schedule<R: Rng + ?Sized>(params: SessionParams, rng: &mut R) -> Result<Session, SessionError> {
    schedule_with(params, rng, |_| {})
}

/// Like [`schedule`], but `on_note` sees every note the moment it is
/// scheduled (realtime playback hooks in here).
pub fn schedule_with<R, F>(params: SessionParams, rng: &mut R, on_note: F) -> Result<Session, SessionError>
where
    R: Rng + ?Sized,
    F: FnMut(&ScheduledNote),
{
    Ok(Session::new(params)?.run_with(rng, on_note))
}
