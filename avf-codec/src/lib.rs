//! AVF-Codec: AVF (Atari Video Format) decoder
//!
//! This crate decodes the fixed-layout AVF container into displayable RGB
//! frames and a synchronized PCM audio track. It is a pure library: it knows
//! nothing about windows, audio devices or input handling. A player feeds it
//! file bytes and the parameters its output device actually negotiated, and
//! gets back pixel buffers and a ready-to-play sample buffer.
//!
//! # Key Features
//!
//! - **Container demuxing**: fixed 8704-byte frame chunks, header-skip
//!   heuristic for files carrying a leading 8192-byte header
//! - **GTIA palette emulation**: 256-color (16 hue x 16 luma) table built
//!   from a YIQ/YUV-style transform, regenerable from two tunables
//! - **CRT post-processing**: horizontal blending and scanline darkening
//! - **Hardware-adaptive audio**: sparse tap reconstruction, time-stretch
//!   resampling to whatever rate and channel count the device granted
//!
//! # Format Overview
//!
//! Each 8704-byte frame chunk holds:
//! - 8192 bytes of video: 64 sub-blocks of 128 bytes, each contributing
//!   3 rows of 40 packed chroma/luma bytes to a 192x40 matrix
//! - 512 bytes of audio: a sparse sample map decoded into a fixed-length
//!   tap array (length depends on the TV standard)
//!
//! # Usage
//!
//! ```ignore
//! use avf_codec::{AvfFile, Palette, PlaybackState, VideoStandard};
//!
//! let file = AvfFile::open("movie.avf".as_ref())?;
//! let standard = VideoStandard::Pal;
//! let (video, taps) = avf_codec::demux_file(&file, standard)?;
//!
//! let state = PlaybackState::default();
//! let palette = state.palette();
//! let rgb = avf_codec::render_frame(&video[0], &palette, standard, &state);
//! ```

mod audio;
mod clock;
mod container;
mod demux;
mod error;
mod palette;
mod render;
mod standard;
mod state;

pub use audio::{PcmTrack, assemble_track};
pub use clock::PlaybackClock;
pub use container::{AvfFile, has_leading_header};
pub use demux::{AudioTap, VideoFrame, decode_tap_block, demux_audio, demux_file, demux_video};
pub use error::AvfError;
pub use palette::Palette;
pub use render::render_frame;
pub use standard::VideoStandard;
pub use state::{PlaybackState, TUNING_STEP};

// =============================================================================
// Constants
// =============================================================================

/// Total size of one frame chunk (video block + audio block)
pub const FRAME_SIZE: usize = 8704;

/// Size of the optional leading file header
pub const HEADER_SIZE: usize = 8192;

/// Size of the video block within a frame chunk
pub const VIDEO_BLOCK_SIZE: usize = 8192;

/// Size of the audio block within a frame chunk
pub const AUDIO_BLOCK_SIZE: usize = 512;

/// Rows in the demuxed byte matrix (interleaved chroma/luma lines)
pub const MATRIX_ROWS: usize = 192;

/// Packed bytes per matrix row (two 4-bit fields per byte)
pub const MATRIX_PITCH: usize = 40;

/// Width of the rendered frame in pixels
pub const FRAME_WIDTH: usize = 160;

/// Height of the rendered frame in pixels
pub const FRAME_HEIGHT: usize = 192;

/// Raw audio silence level (taps are unsigned, 0..=100, centered on 50)
pub const SILENCE: u8 = 50;

/// Default palette phase shift
pub const DEFAULT_PHASE_SHIFT: f32 = 1.8;

/// Default palette saturation
pub const DEFAULT_SATURATION: f32 = 0.15;
