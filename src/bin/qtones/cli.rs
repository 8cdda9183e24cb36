//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use quantum_tones::session::{KeyChangeRule, SessionParams};

#[derive(Parser)]
#[command(name = "qtones")]
#[command(about = "Melodies from a quantum harmonic oscillator", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub session: SessionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct SessionArgs {
    /// Starting key (C, C#, D, ... B); unknown keys fall back to C major
    #[arg(short, long, default_value = "C", global = true)]
    pub key: String,

    /// Scale type: major or minor
    #[arg(short, long, default_value = "major", global = true)]
    pub scale: String,

    /// Tempo in beats per minute (one note per beat)
    #[arg(short, long, default_value = "120", global = true)]
    pub bpm: u32,

    /// Session length in seconds
    #[arg(short, long, default_value = "10", global = true)]
    pub duration: u32,

    /// Seed for a reproducible session
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Chance per note of jumping to a random key
    #[arg(long, default_value = "0.01", global = true)]
    pub key_change_probability: f64,
}

impl SessionArgs {
    pub fn to_params(&self) -> SessionParams {
        SessionParams::from_names(&self.key, &self.scale, self.bpm, self.duration)
            .key_change(KeyChangeRule::new(self.key_change_probability))
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a session and print its notes
    Generate,

    /// Generate a session and play it through the default output device
    Play,

    /// Generate a session and render it to a WAV file
    Export {
        /// Output WAV file path
        #[arg(default_value = "quantum_music.wav")]
        output: PathBuf,
    },
}
