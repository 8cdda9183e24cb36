//! Error types for session generation, rendering and export.

use thiserror::Error;

/// Rejected session inputs. Nothing is scheduled when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid tempo: {bpm} BPM (must be positive)")]
    InvalidBpm { bpm: u32 },

    #[error("invalid duration: {seconds} seconds (must be positive)")]
    InvalidDuration { seconds: u32 },

    #[error("session too long: {notes} notes exceeds the limit of {max}")]
    TooManyNotes { notes: u64, max: u64 },
}

/// The offline renderer could not produce a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("nothing to render: the timeline has no notes")]
    EmptyTimeline,

    #[error("render too long: {frames} frames exceeds the limit of {max}")]
    TooLong { frames: u64, max: u64 },

    #[error("could not allocate a buffer of {frames} frames")]
    Allocation { frames: u64 },

    #[error("render worker panicked")]
    Panicked,
}

/// Export failed; no output file was produced.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no audio generated to export")]
    EmptySession,

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
