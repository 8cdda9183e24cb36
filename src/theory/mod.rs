// Purpose: pitch names, frequencies and scale lookup

pub mod pitch;
pub mod scale;

pub use pitch::{note_to_frequency, PitchClass};
pub use scale::{Scale, ScaleTable, ScaleType};
