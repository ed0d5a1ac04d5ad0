//! avfplay - AVF video player
//!
//! Plays AVF (Atari Video Format) files with GTIA palette emulation and
//! CRT post-processing.
//!
//! # Usage
//!
//! ```bash
//! avfplay movie.avf
//! avfplay movie.avf ntsc --scale 4
//! avfplay movie.avf --debug
//! ```
//!
//! # Keyboard Shortcuts
//!
//! - S: Toggle scanlines
//! - B: Toggle horizontal blending
//! - [ / ]: Phase -/+ (with Shift: saturation -/+)
//! - L: Toggle loop
//! - D: Toggle debug stats
//! - Space: Pause/Resume
//! - ESC: Quit

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use avf_codec::VideoStandard;
use avfplay::{PlayerConfig, run};

#[derive(Parser)]
#[command(name = "avfplay")]
#[command(author, version, about = "AVF (Atari Video Format) video player")]
struct Args {
    /// Input AVF file
    file: PathBuf,

    /// TV system the recording was made for
    #[arg(value_enum, ignore_case = true, default_value = "pal")]
    system: System,

    /// Window scale factor
    #[arg(long, short = 's', default_value = "3")]
    scale: u32,

    /// Enable debug stats logging
    #[arg(long, short = 'd')]
    debug: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum System {
    /// 50 Hz standard
    Pal,
    /// 60 Hz standard
    Ntsc,
}

impl From<System> for VideoStandard {
    fn from(system: System) -> Self {
        match system {
            System::Pal => VideoStandard::Pal,
            System::Ntsc => VideoStandard::Ntsc,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if !args.file.exists() {
        anyhow::bail!("File not found: {}", args.file.display());
    }

    let config = PlayerConfig {
        path: args.file,
        standard: args.system.into(),
        scale: args.scale,
        debug: args.debug,
    };

    run(config)
}
