//! Audio track assembly
//!
//! Per-frame audio taps are concatenated, centered around zero and
//! time-stretched to the host device's sample rate in one pass at load
//! time. The stretch is continuous over the whole recording - the track is
//! resampled so its end time equals the video's end time exactly, whatever
//! the ratio between the source tap rate and the device rate. That single
//! property is what keeps audio and video in sync over a long session
//! despite the two clocks having no feedback path between them.
//!
//! Tuning changes never touch the track: its length is fixed once computed.

use crate::{AudioTap, SILENCE, VideoStandard};

/// Fixed gain applied to centered taps before quantization
const GAIN: f32 = 500.0;

/// PCM clip limit (slightly inside i16 range, as the original hardware
/// player used)
const CLIP: f32 = 32000.0;

/// Final interleaved 16-bit PCM buffer at the device's negotiated rate and
/// channel count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmTrack {
    /// Interleaved samples, `frames * channels` entries
    pub samples: Vec<i16>,
    /// Output channel count (mono source replicated)
    pub channels: u16,
    /// Output sample rate in Hz
    pub sample_rate: u32,
}

impl PcmTrack {
    /// Sample frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }
}

/// Assemble the playback track from per-frame taps.
///
/// `sample_rate` and `channels` must be the values the output device
/// actually granted, not the ones requested from it.
pub fn assemble_track(
    taps: &[AudioTap],
    standard: VideoStandard,
    sample_rate: u32,
    channels: u16,
) -> PcmTrack {
    // Concatenate and center: taps are unsigned 0..=100 with silence at 50
    let centered: Vec<f32> = taps
        .iter()
        .flat_map(|tap| tap.samples())
        .map(|&s| s.min(100) as f32 - SILENCE as f32)
        .collect();

    let duration = taps.len() as f64 / standard.fps();
    let target = (duration * sample_rate as f64).round() as usize;

    let stretched = resample_linear(&centered, target);

    let mut samples = Vec::with_capacity(target * channels as usize);
    for value in stretched {
        let sample = (value * GAIN).clamp(-CLIP, CLIP) as i16;
        for _ in 0..channels {
            samples.push(sample);
        }
    }

    tracing::debug!(
        "assembled PCM track: {} frames at {} Hz, {} channel(s)",
        target,
        sample_rate,
        channels
    );

    PcmTrack {
        samples,
        channels,
        sample_rate,
    }
}

/// Time-stretch `input` to exactly `target` samples by linear interpolation
/// over the normalized `[0, 1]` axis (both endpoints map onto each other).
fn resample_linear(input: &[f32], target: usize) -> Vec<f32> {
    if target == 0 {
        return Vec::new();
    }
    if input.is_empty() {
        return vec![0.0; target];
    }
    if input.len() == 1 || target == 1 {
        return vec![input[0]; target];
    }

    let step = (input.len() - 1) as f64 / (target - 1) as f64;
    (0..target)
        .map(|i| {
            let position = i as f64 * step;
            let index = position as usize;
            if index + 1 >= input.len() {
                input[input.len() - 1]
            } else {
                let fraction = (position - index as f64) as f32;
                input[index] + (input[index + 1] - input[index]) * fraction
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AUDIO_BLOCK_SIZE, decode_tap_block};

    fn silent_taps(count: usize, standard: VideoStandard) -> Vec<AudioTap> {
        (0..count)
            .map(|_| decode_tap_block(&[SILENCE; AUDIO_BLOCK_SIZE], standard))
            .collect()
    }

    #[test]
    fn test_track_length_matches_duration() {
        let standard = VideoStandard::Pal;
        let taps = silent_taps(100, standard);
        let track = assemble_track(&taps, standard, 48000, 2);

        let expected = (100.0 / standard.fps() * 48000.0).round() as usize;
        assert_eq!(track.frames(), expected);
        assert_eq!(track.samples.len(), expected * 2);
        assert_eq!(track.sample_rate, 48000);
    }

    #[test]
    fn test_silence_is_all_zero() {
        let standard = VideoStandard::Ntsc;
        let taps = silent_taps(3, standard);
        let track = assemble_track(&taps, standard, 44100, 1);
        assert!(track.samples.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_channels_replicated() {
        let standard = VideoStandard::Pal;
        let mut block = [SILENCE; AUDIO_BLOCK_SIZE];
        block[0] = 80; // one loud tap at index 0
        let taps = vec![decode_tap_block(&block, standard)];
        let track = assemble_track(&taps, standard, 44100, 4);

        for frame in track.samples.chunks(4) {
            assert!(frame.iter().all(|&s| s == frame[0]));
        }
        // The loud tap survived scaling: (80 - 50) * 500
        assert_eq!(track.samples[0], 15000);
    }

    #[test]
    fn test_gain_is_clipped() {
        let standard = VideoStandard::Pal;
        // Max tap value 100 -> (100 - 50) * 500 = 25000, under the limit;
        // feed raw 255 to confirm the input clamp to [0, 100] fires first.
        let block = [255u8; AUDIO_BLOCK_SIZE];
        let taps = vec![decode_tap_block(&block, standard)];
        let track = assemble_track(&taps, standard, 44100, 1);
        assert!(track.samples.iter().all(|&s| s <= 25000));
        assert_eq!(track.samples[0], 25000);
    }

    #[test]
    fn test_no_taps_yields_empty_track() {
        let track = assemble_track(&[], VideoStandard::Pal, 44100, 2);
        assert!(track.samples.is_empty());
        assert_eq!(track.frames(), 0);
    }

    #[test]
    fn test_resample_identity() {
        let input = [1.0f32, 2.0, 3.0, 4.0];
        assert_eq!(resample_linear(&input, 4), input.to_vec());
    }

    #[test]
    fn test_resample_endpoints_preserved() {
        let input = [5.0f32, -1.0, 0.5, 7.0, -3.0];
        for target in [2usize, 3, 10, 1000] {
            let out = resample_linear(&input, target);
            assert_eq!(out.len(), target);
            assert_eq!(out[0], 5.0);
            assert_eq!(*out.last().unwrap(), -3.0);
        }
    }

    #[test]
    fn test_resample_upsample_midpoint() {
        // Stretching [0, 1] to 3 samples puts the midpoint at 0.5
        let out = resample_linear(&[0.0, 1.0], 3);
        assert_eq!(out, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_resample_degenerate_cases() {
        assert!(resample_linear(&[1.0, 2.0], 0).is_empty());
        assert_eq!(resample_linear(&[], 5), vec![0.0; 5]);
        assert_eq!(resample_linear(&[3.0], 4), vec![3.0; 4]);
        assert_eq!(resample_linear(&[3.0, 9.0], 1), vec![3.0]);
    }
}
