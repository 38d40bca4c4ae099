use std::time::{Duration, Instant};

/// Frame timing information handed to the per-frame callback.
#[derive(Debug, Clone)]
pub struct FrameTime {
    /// Time elapsed since the last frame
    pub delta: Duration,
    /// Total time elapsed since the loop started
    pub elapsed: Duration,
    /// Total number of frames rendered
    pub frame_count: u64,
}

impl FrameTime {
    pub fn new() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Returns delta time in seconds (f32)
    #[inline]
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Returns elapsed time in seconds (f32)
    #[inline]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

impl Default for FrameTime {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks wall-clock time for the render loop.
///
/// Delta time is never negative: a clock reading behind the previous frame
/// clamps the delta to zero and logs a warning instead of propagating a
/// negative duration.
pub struct TimeTracker {
    start_time: Instant,
    last_frame_time: Instant,
    frame_count: u64,
}

impl TimeTracker {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame_time: now,
            frame_count: 0,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let delta = match now.checked_duration_since(self.last_frame_time) {
            Some(delta) => delta,
            None => {
                tracing::warn!("non-monotonic clock reading, clamping delta to zero");
                Duration::ZERO
            }
        };
        let elapsed = now.saturating_duration_since(self.start_time);

        self.last_frame_time = now;
        self.frame_count += 1;

        FrameTime {
            delta,
            elapsed,
            frame_count: self.frame_count,
        }
    }
}

impl Default for TimeTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances_frame_count() {
        let mut tracker = TimeTracker::new();
        let first = tracker.tick();
        let second = tracker.tick();
        assert_eq!(first.frame_count, 1);
        assert_eq!(second.frame_count, 2);
        assert!(second.elapsed >= first.elapsed);
    }

    #[test]
    fn delta_is_never_negative() {
        let mut tracker = TimeTracker::new();
        for _ in 0..10 {
            let time = tracker.tick();
            assert!(time.delta_seconds() >= 0.0);
        }
    }
}
