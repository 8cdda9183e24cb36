#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::OscillatorWaveform;
use crate::session::ScheduledNote;

/// One oscillator burst: what to play, how loud, and when.
///
/// Both renderers consume these, so live playback and an exported file hear
/// exactly the same waveform, pitch and gain for every note.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneEvent {
    pub waveform: OscillatorWaveform,
    /// Hz
    pub frequency: f32,
    /// Linear gain
    pub amplitude: f32,
    /// Seconds from session start
    pub start: f64,
    /// Seconds
    pub duration: f64,
}

impl ToneEvent {
    pub fn from_note(scheduled: &ScheduledNote) -> Self {
        Self {
            waveform: scheduled.note.timbre,
            frequency: scheduled.note.pitch.frequency(),
            amplitude: scheduled.note.velocity as f32,
            start: scheduled.start_time,
            duration: scheduled.duration,
        }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Anything that accepts tones to sound: an audio device, or a collector.
pub trait ToneSink {
    fn schedule_tone(&mut self, event: ToneEvent);
}

/// Collects events for later (offline) rendering.
impl ToneSink for Vec<ToneEvent> {
    fn schedule_tone(&mut self, event: ToneEvent) {
        self.push(event);
    }
}

/// Send every note of a finished timeline to `sink`.
pub fn play_notes<S: ToneSink + ?Sized>(notes: &[ScheduledNote], sink: &mut S) {
    for note in notes {
        sink.schedule_tone(ToneEvent::from_note(note));
    }
}

/// Tone events for a whole timeline.
pub fn tone_events(notes: &[ScheduledNote]) -> Vec<ToneEvent> {
    notes.iter().map(ToneEvent::from_note).collect()
}
