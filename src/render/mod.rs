//! Turning a note timeline into sound.
//!
//! Every note becomes a [`ToneEvent`] through one mapping. From there the
//! two clocks diverge: the offline renderer writes events into a fixed
//! buffer, the device renderer plays them against the sound card's clock.
//! Both mix through the same [`ToneVoice`].

/// Realtime playback through cpal.
#[cfg(feature = "rtrb")]
pub mod device;
/// Note to oscillator-event mapping and the sink trait.
pub mod event;
/// Buffer rendering on a worker thread.
pub mod offline;
/// Sample-accurate voice shared by both renderers.
pub mod voice;

#[cfg(feature = "rtrb")]
pub use device::{DeviceError, DeviceOutput};
pub use event::{play_notes, tone_events, ToneEvent, ToneSink};
pub use offline::{OfflineRender, OfflineRenderer, RenderJob};
pub use voice::ToneVoice;
