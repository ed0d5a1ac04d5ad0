//! Audio playback backend
//!
//! One-shot track playback over cpal. The whole PCM track is assembled up
//! front by the codec at the rate and channel count the device actually
//! granted; the device callback then consumes it through a shared cursor
//! and the main thread never feeds samples during playback. Sync with video
//! relies purely on both sides running at the same fps-derived duration.
//!
//! A machine without an audio device degrades to silent playback instead of
//! refusing to start.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{debug, error, info, warn};

use avf_codec::PcmTrack;

/// Sample rate assumed for track assembly when no device is available
const FALLBACK_SAMPLE_RATE: u32 = 44_100;

/// Channel count assumed when no device is available
const FALLBACK_CHANNELS: u16 = 2;

/// Playback position shared with the device callback
struct TrackState {
    /// Interleaved PCM samples; swapped in once before playback starts
    samples: Mutex<Arc<Vec<i16>>>,
    /// Next sample index to play (in samples, not frames)
    cursor: AtomicUsize,
    playing: AtomicBool,
}

impl TrackState {
    fn new() -> Self {
        Self {
            samples: Mutex::new(Arc::new(Vec::new())),
            cursor: AtomicUsize::new(0),
            playing: AtomicBool::new(false),
        }
    }
}

/// Produce the next output sample. Past the end of the track (or while
/// paused) the device keeps running on silence.
fn next_sample(state: &TrackState) -> i16 {
    if !state.playing.load(Ordering::Relaxed) {
        return 0;
    }
    // The main thread only locks this briefly to install the track; if the
    // callback loses that race it plays one buffer of silence.
    let Ok(track) = state.samples.try_lock() else {
        return 0;
    };
    let position = state.cursor.fetch_add(1, Ordering::Relaxed);
    track.get(position).copied().unwrap_or(0)
}

/// Audio output using cpal with a shared track cursor
pub struct AudioOutput {
    state: Arc<TrackState>,
    /// The cpal stream (kept alive for the duration)
    _stream: cpal::Stream,
    sample_rate: u32,
    channels: u16,
}

impl AudioOutput {
    /// Open the default output device and start a silent stream.
    ///
    /// The reported sample rate and channel count are what the hardware
    /// granted, which is what the track must be assembled against.
    pub fn new() -> Result<Self, String> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| "No audio output device available".to_string())?;

        let config = device
            .default_output_config()
            .map_err(|e| format!("Failed to get default output config: {}", e))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();

        let state = Arc::new(TrackState::new());

        // Build the stream based on sample format
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                let config = config.into();
                let state = Arc::clone(&state);
                device
                    .build_output_stream(
                        &config,
                        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                            for sample in data.iter_mut() {
                                *sample = next_sample(&state) as f32 / 32768.0;
                            }
                        },
                        |err| error!("Audio stream error: {}", err),
                        None,
                    )
                    .map_err(|e| format!("Failed to build audio stream: {}", e))?
            }
            cpal::SampleFormat::I16 => {
                let config = config.into();
                let state = Arc::clone(&state);
                device
                    .build_output_stream(
                        &config,
                        move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                            for sample in data.iter_mut() {
                                *sample = next_sample(&state);
                            }
                        },
                        |err| error!("Audio stream error: {}", err),
                        None,
                    )
                    .map_err(|e| format!("Failed to build audio stream: {}", e))?
            }
            cpal::SampleFormat::U16 => {
                let config = config.into();
                let state = Arc::clone(&state);
                device
                    .build_output_stream(
                        &config,
                        move |data: &mut [u16], _: &cpal::OutputCallbackInfo| {
                            for sample in data.iter_mut() {
                                *sample = (next_sample(&state) as i32 + 32768) as u16;
                            }
                        },
                        |err| error!("Audio stream error: {}", err),
                        None,
                    )
                    .map_err(|e| format!("Failed to build audio stream: {}", e))?
            }
            _ => {
                return Err(format!(
                    "Unsupported sample format: {:?}",
                    config.sample_format()
                ));
            }
        };

        stream
            .play()
            .map_err(|e| format!("Failed to play audio stream: {}", e))?;

        debug!("Audio stream started");

        Ok(Self {
            state,
            _stream: stream,
            sample_rate,
            channels,
        })
    }

    /// Install the assembled track. Resets the cursor; does not start
    /// playback by itself.
    pub fn set_track(&self, track: PcmTrack) {
        let mut samples = self.state.samples.lock().unwrap();
        *samples = Arc::new(track.samples);
        self.state.cursor.store(0, Ordering::Relaxed);
    }

    pub fn play(&self) {
        self.state.cursor.store(0, Ordering::Relaxed);
        self.state.playing.store(true, Ordering::Relaxed);
    }

    pub fn pause(&self) {
        self.state.playing.store(false, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.state.playing.store(true, Ordering::Relaxed);
    }

    /// Jump back to the start without pausing (loop restart)
    pub fn rewind(&self) {
        self.state.cursor.store(0, Ordering::Relaxed);
    }

    pub fn stop(&self) {
        self.state.playing.store(false, Ordering::Relaxed);
        self.state.cursor.store(0, Ordering::Relaxed);
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

/// Player audio backend: a real device when one exists, silence otherwise
pub struct PlayerAudio {
    output: Option<AudioOutput>,
}

impl PlayerAudio {
    pub fn new() -> Self {
        match AudioOutput::new() {
            Ok(output) => {
                info!(
                    "Audio hardware: {} Hz, {} channel(s)",
                    output.sample_rate(),
                    output.channels()
                );
                Self {
                    output: Some(output),
                }
            }
            Err(e) => {
                warn!("Failed to create audio output: {}. Audio disabled.", e);
                Self { output: None }
            }
        }
    }

    /// Negotiated device sample rate (or the assembly fallback)
    pub fn sample_rate(&self) -> u32 {
        self.output
            .as_ref()
            .map(|o| o.sample_rate())
            .unwrap_or(FALLBACK_SAMPLE_RATE)
    }

    /// Negotiated device channel count (or the assembly fallback)
    pub fn channels(&self) -> u16 {
        self.output
            .as_ref()
            .map(|o| o.channels())
            .unwrap_or(FALLBACK_CHANNELS)
    }

    pub fn set_track(&self, track: PcmTrack) {
        if let Some(output) = &self.output {
            output.set_track(track);
        }
    }

    pub fn play(&self) {
        if let Some(output) = &self.output {
            output.play();
        }
    }

    pub fn pause(&self) {
        if let Some(output) = &self.output {
            output.pause();
        }
    }

    pub fn resume(&self) {
        if let Some(output) = &self.output {
            output.resume();
        }
    }

    pub fn rewind(&self) {
        if let Some(output) = &self.output {
            output.rewind();
        }
    }

    pub fn stop(&self) {
        if let Some(output) = &self.output {
            output.stop();
        }
    }
}

impl Default for PlayerAudio {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_state_silent_until_playing() {
        let state = TrackState::new();
        *state.samples.lock().unwrap() = Arc::new(vec![100, 200, 300]);
        assert_eq!(next_sample(&state), 0);
        assert_eq!(state.cursor.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_track_state_advances_and_runs_out() {
        let state = TrackState::new();
        *state.samples.lock().unwrap() = Arc::new(vec![7, -8]);
        state.playing.store(true, Ordering::Relaxed);

        assert_eq!(next_sample(&state), 7);
        assert_eq!(next_sample(&state), -8);
        // Past the end: silence forever, no panic
        assert_eq!(next_sample(&state), 0);
        assert_eq!(next_sample(&state), 0);
    }

    #[test]
    fn test_pause_holds_position() {
        let state = TrackState::new();
        *state.samples.lock().unwrap() = Arc::new(vec![1, 2, 3]);
        state.playing.store(true, Ordering::Relaxed);

        assert_eq!(next_sample(&state), 1);
        state.playing.store(false, Ordering::Relaxed);
        assert_eq!(next_sample(&state), 0);
        state.playing.store(true, Ordering::Relaxed);
        assert_eq!(next_sample(&state), 2);
    }
}
