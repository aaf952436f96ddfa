//! Frame rate limiting

use std::time::Duration;

/// Drops frames that arrive before the frame budget has elapsed
///
/// Frames are skipped, never queued: a skipped frame simply does no work.
#[derive(Clone, Copy, Debug)]
pub struct FrameLimiter {
    interval: Duration,
    last: Option<Duration>,
}

impl FrameLimiter {
    /// Limit to `target_fps` updates per second (`0` = unlimited)
    pub fn new(target_fps: u32) -> Self {
        let interval = if target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_micros(1_000_000 / u64::from(target_fps))
        };
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a frame at `now` should do work; records it if so
    pub fn ready(&mut self, now: Duration) -> bool {
        match self.last {
            Some(last) if now.saturating_sub(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Forget the last applied frame so the next one always runs
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for FrameLimiter {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_first_frame_runs() {
        let mut limiter = FrameLimiter::new(60);
        assert!(limiter.ready(ms(5)));
    }

    #[test]
    fn test_skips_early_frames() {
        let mut limiter = FrameLimiter::new(60);
        assert!(limiter.ready(ms(0)));
        assert!(!limiter.ready(ms(8)));
        assert!(!limiter.ready(ms(16)));
        assert!(limiter.ready(ms(17)));
        // Budget counts from the last applied frame, not the skipped ones
        assert!(!limiter.ready(ms(30)));
        assert!(limiter.ready(ms(34)));
    }

    #[test]
    fn test_vsync_timestamps_pass() {
        let mut limiter = FrameLimiter::new(60);
        let frame = Duration::from_secs_f64(1.0 / 60.0);
        for i in 0..10 {
            assert!(limiter.ready(frame * i));
        }
    }

    #[test]
    fn test_unlimited() {
        let mut limiter = FrameLimiter::new(0);
        assert!(limiter.ready(ms(1)));
        assert!(limiter.ready(ms(1)));
    }

    #[test]
    fn test_reset() {
        let mut limiter = FrameLimiter::new(60);
        assert!(limiter.ready(ms(100)));
        limiter.reset();
        assert!(limiter.ready(ms(101)));
    }
}
