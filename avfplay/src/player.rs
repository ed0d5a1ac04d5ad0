//! Player entry point
//!
//! Loads and demuxes the whole file up front, assembles the audio track
//! against the parameters the device actually granted, then hands
//! everything to the event loop.

use std::path::PathBuf;

use anyhow::{Context, Result};
use winit::event_loop::EventLoop;

use avf_codec::{AvfFile, VideoStandard, assemble_track, demux_file};

use crate::app::PlayerApp;
use crate::audio::PlayerAudio;

/// Player configuration passed from the CLI
pub struct PlayerConfig {
    /// AVF file to play
    pub path: PathBuf,
    /// TV standard of the recording
    pub standard: VideoStandard,
    /// Window scale factor
    pub scale: u32,
    /// Enable debug stats logging
    pub debug: bool,
}

/// Run the player to completion
pub fn run(config: PlayerConfig) -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting AVF player");
    tracing::info!("File: {}", config.path.display());

    let file = AvfFile::open(&config.path).context("Failed to read AVF file")?;
    let (frames, taps) =
        demux_file(&file, config.standard).context("Failed to demux AVF container")?;

    if frames.is_empty() {
        anyhow::bail!(
            "No complete frames in {} ({} standard)",
            config.path.display(),
            config.standard
        );
    }
    tracing::info!(
        "Demuxed {} frames ({}, {:.2} fps, header {})",
        frames.len(),
        config.standard,
        config.standard.fps(),
        if file.skipped_header() {
            "skipped"
        } else {
            "absent"
        }
    );

    // The device dictates the track's rate and channel count
    let audio = PlayerAudio::new();
    let track = assemble_track(&taps, config.standard, audio.sample_rate(), audio.channels());
    tracing::info!(
        "Audio track: {} frames at {} Hz, {} channel(s)",
        track.frames(),
        track.sample_rate,
        track.channels
    );
    audio.set_track(track);

    let file_name = config
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.path.display().to_string());

    let mut app = PlayerApp::new(
        file_name,
        config.standard,
        config.scale.max(1),
        config.debug,
        frames,
        audio,
    );

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app)?;

    tracing::info!("Playback finished");
    Ok(())
}
