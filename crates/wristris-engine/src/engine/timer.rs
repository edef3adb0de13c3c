use std::time::Duration;

/// Countdown timer measured in frames of a fixed-rate loop.
///
/// The timer fires once every `period` frames. After firing it re-arms
/// itself, so a one-shot timer is simply dropped by its owner once it fires.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use wristris_engine::FrameTimer;
///
/// let mut timer = FrameTimer::from_interval(Duration::from_millis(50), 60);
/// assert_eq!(timer.period(), 3);
/// assert!(!timer.tick());
/// assert!(!timer.tick());
/// assert!(timer.tick());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTimer {
    period: u64,
    remaining: u64,
}

impl FrameTimer {
    /// Creates a timer firing every `period` frames (at least one).
    #[must_use]
    pub fn new(period: u64) -> Self {
        let period = period.max(1);
        Self {
            period,
            remaining: period,
        }
    }

    /// Converts a wall-clock interval into frames at `fps`.
    #[must_use]
    pub fn from_interval(interval: Duration, fps: u64) -> Self {
        let millis = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        Self::new(millis.saturating_mul(fps) / 1000)
    }

    #[must_use]
    pub fn period(&self) -> u64 {
        self.period
    }

    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Advances one frame and returns `true` when the timer fires.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.remaining = self.period;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_interval_to_frames() {
        assert_eq!(FrameTimer::from_interval(Duration::from_millis(1000), 60).period(), 60);
        assert_eq!(FrameTimer::from_interval(Duration::from_millis(700), 60).period(), 42);
        assert_eq!(FrameTimer::from_interval(Duration::from_millis(1), 60).period(), 1);
    }

    #[test]
    fn test_fires_periodically() {
        let mut timer = FrameTimer::new(2);
        let fired: Vec<bool> = (0..6).map(|_| timer.tick()).collect();
        assert_eq!(fired, [false, true, false, true, false, true]);
        assert_eq!(timer.remaining(), 2);
    }

    #[test]
    fn test_zero_period_fires_every_frame() {
        let mut timer = FrameTimer::new(0);
        assert!(timer.tick());
        assert!(timer.tick());
    }
}
