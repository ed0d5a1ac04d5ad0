//! AVF player runtime
//!
//! Wires the pure `avf-codec` decoder to the host machine: a cpal audio
//! device, a winit window with a wgpu blit surface, and keyboard transport
//! controls. The codec decides what every frame looks and sounds like; this
//! crate decides when to show it and where.

pub mod app;
pub mod audio;
pub mod graphics;
pub mod player;

pub use player::{PlayerConfig, run};
