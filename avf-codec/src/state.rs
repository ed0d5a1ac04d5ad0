//! Playback tuning state
//!
//! All runtime-tunable values live in one explicit value that the player
//! passes into the palette synthesizer and render pipeline each step. Input
//! handling mutates it through setters; nothing here is ambient or global.
//!
//! Tuning setters report whether the palette must be regenerated; the
//! regeneration itself is an explicit call by the owner (see
//! [`PlaybackState::palette`]), never a hidden side effect of a setter.

use crate::{DEFAULT_PHASE_SHIFT, DEFAULT_SATURATION, Palette};

/// Step applied by the phase/saturation adjustment events
pub const TUNING_STEP: f32 = 0.05;

/// Runtime tunables and toggle flags
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    /// Palette hue rotation in radians
    pub phase_shift: f32,
    /// Palette saturation, clamped to `[0, 2]`
    pub saturation: f32,
    /// CRT scanline darkening
    pub scanlines: bool,
    /// Horizontal blending (blur)
    pub blending: bool,
    /// Restart playback at end of file
    pub looping: bool,
    /// Debug stats logging
    pub debug: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            phase_shift: DEFAULT_PHASE_SHIFT,
            saturation: DEFAULT_SATURATION,
            scanlines: true,
            blending: true,
            looping: false,
            debug: false,
        }
    }
}

impl PlaybackState {
    /// Shift the palette phase. Unclamped. Returns true: the palette needs
    /// regenerating.
    pub fn adjust_phase(&mut self, delta: f32) -> bool {
        self.phase_shift += delta;
        true
    }

    /// Adjust saturation, clamped to `[0, 2]`. Returns true: the palette
    /// needs regenerating.
    pub fn adjust_saturation(&mut self, delta: f32) -> bool {
        self.saturation = (self.saturation + delta).clamp(0.0, 2.0);
        true
    }

    pub fn toggle_scanlines(&mut self) -> bool {
        self.scanlines = !self.scanlines;
        self.scanlines
    }

    pub fn toggle_blending(&mut self) -> bool {
        self.blending = !self.blending;
        self.blending
    }

    pub fn toggle_looping(&mut self) -> bool {
        self.looping = !self.looping;
        self.looping
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.debug = !self.debug;
        self.debug
    }

    /// Synthesize the palette for the current tunables.
    ///
    /// The returned table is complete; assigning it over the previous one
    /// is the atomic swap the renderer relies on.
    pub fn palette(&self) -> Palette {
        Palette::generate(self.phase_shift, self.saturation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = PlaybackState::default();
        assert_eq!(state.phase_shift, 1.8);
        assert_eq!(state.saturation, 0.15);
        assert!(state.scanlines);
        assert!(state.blending);
        assert!(!state.looping);
        assert!(!state.debug);
    }

    #[test]
    fn test_saturation_clamped() {
        let mut state = PlaybackState::default();
        for _ in 0..100 {
            state.adjust_saturation(TUNING_STEP);
        }
        assert_eq!(state.saturation, 2.0);
        for _ in 0..100 {
            state.adjust_saturation(-TUNING_STEP);
        }
        assert_eq!(state.saturation, 0.0);
    }

    #[test]
    fn test_phase_unclamped() {
        let mut state = PlaybackState::default();
        for _ in 0..200 {
            state.adjust_phase(-TUNING_STEP);
        }
        assert!(state.phase_shift < 0.0);
    }

    #[test]
    fn test_toggles() {
        let mut state = PlaybackState::default();
        assert!(!state.toggle_scanlines());
        assert!(state.toggle_scanlines());
        assert!(state.toggle_looping());
        assert!(!state.toggle_looping());
    }

    #[test]
    fn test_palette_matches_manual_generation() {
        let mut state = PlaybackState::default();
        state.adjust_phase(TUNING_STEP);
        assert_eq!(
            state.palette(),
            Palette::generate(1.8 + TUNING_STEP, 0.15)
        );
    }
}
