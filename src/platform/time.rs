//! Frame timestamps
//!
//! The frame loop only needs "give me the next frame time, or stop". In the
//! browser that comes from `requestAnimationFrame`; natively and in tests it
//! comes from one of the sources below.

/// Produces monotonically increasing frame timestamps in milliseconds
pub trait FrameSource {
    /// Timestamp of the next frame, or `None` to stop the loop
    fn next_frame(&mut self) -> Option<f64>;
}

/// Deterministic frames at a fixed interval, for tests and headless runs
#[derive(Debug, Clone)]
pub struct FixedFrames {
    interval_ms: f64,
    now_ms: f64,
    remaining: u64,
}

impl FixedFrames {
    pub fn new(interval_ms: f64, count: u64) -> Self {
        Self {
            interval_ms,
            now_ms: 0.0,
            remaining: count,
        }
    }

    /// `seconds` worth of frames at `hz`
    pub fn at_rate(hz: f64, seconds: f64) -> Self {
        Self::new(1000.0 / hz, (hz * seconds).round() as u64)
    }
}

impl FrameSource for FixedFrames {
    fn next_frame(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.now_ms += self.interval_ms;
        Some(self.now_ms)
    }
}

/// Wall-clock frames paced to a target rate (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct RealtimeFrames {
    start: std::time::Instant,
    interval: std::time::Duration,
    next_deadline: std::time::Instant,
    until: Option<std::time::Duration>,
}

#[cfg(not(target_arch = "wasm32"))]
impl RealtimeFrames {
    /// Pace frames at `hz`, stopping after `run_for` if given
    pub fn new(hz: f64, run_for: Option<std::time::Duration>) -> Self {
        let start = std::time::Instant::now();
        Self {
            start,
            interval: std::time::Duration::from_secs_f64(1.0 / hz),
            next_deadline: start,
            until: run_for,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl FrameSource for RealtimeFrames {
    fn next_frame(&mut self) -> Option<f64> {
        let now = std::time::Instant::now();
        if self.until.is_some_and(|limit| now - self.start >= limit) {
            return None;
        }
        if now < self.next_deadline {
            std::thread::sleep(self.next_deadline - now);
            self.next_deadline += self.interval;
        } else {
            // Running late: skip the missed frames instead of bursting
            self.next_deadline = now + self.interval;
        }
        Some(self.start.elapsed().as_secs_f64() * 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_frames() {
        let mut frames = FixedFrames::new(16.0, 3);
        assert_eq!(frames.next_frame(), Some(16.0));
        assert_eq!(frames.next_frame(), Some(32.0));
        assert_eq!(frames.next_frame(), Some(48.0));
        assert_eq!(frames.next_frame(), None);
    }

    #[test]
    fn test_at_rate_count() {
        let mut frames = FixedFrames::at_rate(60.0, 2.0);
        let mut count = 0;
        let mut last = 0.0;
        while let Some(t) = frames.next_frame() {
            assert!(t > last);
            last = t;
            count += 1;
        }
        assert_eq!(count, 120);
        assert!((last - 2000.0).abs() < 0.001);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_realtime_frames_stop() {
        let mut frames = RealtimeFrames::new(200.0, Some(std::time::Duration::from_millis(30)));
        let mut count = 0;
        while frames.next_frame().is_some() {
            count += 1;
        }
        assert!(count >= 1);
        assert!(count < 20);
    }
}
