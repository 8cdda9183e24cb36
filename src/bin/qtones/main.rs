//! qtones - quantum oscillator melodies in the terminal
//!
//! Run with: cargo run -- play --key D --scale minor --bpm 96

mod cli;

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use quantum_tones::{
    render::{DeviceOutput, OfflineRenderer},
    Session, Studio,
};

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let params = cli.session.to_params();
    let mut studio = Studio::new(cli.session.seed);

    match cli.command {
        Command::Generate => {
            let session = studio.generate(params).wrap_err("invalid session parameters")?;
            print_notes(session);
        }
        Command::Play => {
            // Reject bad input before touching the audio device
            params.validate().wrap_err("invalid session parameters")?;
            let mut device = DeviceOutput::open(params.expected_note_count() + 1)
                .wrap_err("failed to open audio output")?;
            let session = studio
                .play(params, &mut device)
                .wrap_err("invalid session parameters")?;

            print_notes(session);
            println!("Playing... ({:.1} s)", session.end_time());
            device.wait_until(session.end_time());
        }
        Command::Export { output } => {
            studio.generate(params).wrap_err("invalid session parameters")?;
            let written = studio
                .export_to(&OfflineRenderer::default(), &output)
                .wrap_err_with(|| format!("failed to export {}", output.display()))?;

            println!("Wrote {} bytes to {}", written, output.display());
        }
    }

    Ok(())
}

fn print_notes(session: &Session) {
    let params = session.params();
    println!("=== qtones ===");
    println!("Key: {} {}", params.key, params.scale_type);
    println!("BPM: {}", params.bpm);
    println!("Duration: {} s", params.duration_secs);
    println!();

    println!(
        "{:>6}  {:>5}  {:>8}  {:>8}  {:>4}  {:>6}  {:>8}",
        "time", "pitch", "position", "momentum", "spin", "timbre", "velocity"
    );
    for note in session.notes() {
        println!(
            "{:>6.2}  {:>5}  {:>8.4}  {:>8.4}  {:>4}  {:>6}  {:>8.3}",
            note.start_time,
            note.note.pitch.name(),
            note.position,
            note.momentum,
            format!("{:?}", note.spin),
            format!("{:?}", note.note.timbre),
            note.note.velocity,
        );
    }

    println!();
    println!("Notes: {}", session.notes().len());
    for change in session.key_changes() {
        println!("  key change after step {} -> {}", change.step, change.key);
    }
    println!();
}
