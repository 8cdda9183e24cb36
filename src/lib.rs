pub mod dsp;
pub mod error;
pub mod io; // Rendered buffers and WAV encoding
pub mod quantum; // Oscillator states and note mapping
pub mod render; // Offline and realtime tone rendering
pub mod rng;
pub mod session; // Generation loop
pub mod studio;
pub mod theory; // Pitches and scales

pub use error::{ExportError, RenderError, SessionError};
pub use io::AudioBuffer;
pub use session::{ScheduledNote, Session, SessionParams};
pub use studio::Studio;

pub const MAX_BLOCK_SIZE: usize = 2048;
