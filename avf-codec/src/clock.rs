//! Playback clock
//!
//! Maps wall-clock time to a frame index. Audio is the timing master: the
//! pre-assembled PCM track plays independently on the device, and video
//! follows by deriving its frame index from elapsed time at the same fps.
//! Frames are skipped for free under render pressure because the index
//! comes from the clock, not from a frame counter.
//!
//! All methods take `now` explicitly so the clock can be driven in tests
//! without sleeping.

use std::time::{Duration, Instant};

/// Session timing reference with pause support
#[derive(Debug, Clone, Copy)]
pub struct PlaybackClock {
    start: Instant,
    pause_started: Option<Instant>,
}

impl PlaybackClock {
    /// Start a session at `now`
    pub fn new(now: Instant) -> Self {
        Self {
            start: now,
            pause_started: None,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.pause_started.is_some()
    }

    /// Suspend elapsed-time accumulation. No-op if already paused.
    pub fn pause(&mut self, now: Instant) {
        if self.pause_started.is_none() {
            self.pause_started = Some(now);
        }
    }

    /// Resume after a pause, shifting the start reference forward by the
    /// paused duration so elapsed time continues where it stopped.
    pub fn resume(&mut self, now: Instant) {
        if let Some(pause_started) = self.pause_started.take() {
            self.start += now.duration_since(pause_started);
        }
    }

    /// Restart the session (loop replay)
    pub fn restart(&mut self, now: Instant) {
        self.start = now;
        self.pause_started = None;
    }

    /// Elapsed play time, excluding any paused duration
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.pause_started {
            Some(pause_started) => pause_started.duration_since(self.start),
            None => now.duration_since(self.start),
        }
    }

    /// Frame index for the current elapsed time
    pub fn frame_index(&self, now: Instant, fps: f64) -> usize {
        (self.elapsed(now).as_secs_f64() * fps) as usize
    }

    /// Wall-clock deadline at which `index` becomes the current frame.
    /// Used to schedule the next render wakeup.
    pub fn frame_deadline(&self, index: usize, fps: f64) -> Instant {
        self.start + Duration::from_secs_f64(index as f64 / fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FPS: f64 = 49.86;

    #[test]
    fn test_frame_index_advances_with_time() {
        let t0 = Instant::now();
        let clock = PlaybackClock::new(t0);
        assert_eq!(clock.frame_index(t0, FPS), 0);
        assert_eq!(clock.frame_index(t0 + Duration::from_secs(1), FPS), 49);
        assert_eq!(clock.frame_index(t0 + Duration::from_secs(10), FPS), 498);
    }

    #[test]
    fn test_pause_freezes_index() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new(t0);
        clock.pause(t0 + Duration::from_secs(2));

        let frozen = clock.frame_index(t0 + Duration::from_secs(2), FPS);
        assert_eq!(clock.frame_index(t0 + Duration::from_secs(60), FPS), frozen);
    }

    #[test]
    fn test_resume_excludes_paused_time() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new(t0);
        clock.pause(t0 + Duration::from_secs(2));
        clock.resume(t0 + Duration::from_secs(12));

        // 10 seconds paused: elapsed at t0+13 is 3 seconds
        assert_eq!(
            clock.elapsed(t0 + Duration::from_secs(13)),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn test_double_pause_keeps_first_reference() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new(t0);
        clock.pause(t0 + Duration::from_secs(1));
        clock.pause(t0 + Duration::from_secs(5));
        assert_eq!(
            clock.elapsed(t0 + Duration::from_secs(9)),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_restart_resets_elapsed() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new(t0);
        clock.pause(t0 + Duration::from_secs(4));
        clock.restart(t0 + Duration::from_secs(8));
        assert!(!clock.is_paused());
        assert_eq!(
            clock.elapsed(t0 + Duration::from_secs(9)),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_frame_deadline_round_trips_index() {
        let t0 = Instant::now();
        let clock = PlaybackClock::new(t0);
        for index in [0usize, 1, 49, 500, 12345] {
            let deadline = clock.frame_deadline(index, FPS);
            assert_eq!(clock.frame_index(deadline + Duration::from_micros(10), FPS), index);
        }
    }
}
