//! Click-timing state machine: a second click within
//! `doubleclick_timeout_ms` snaps to word, a third within
//! `tripleclick_timeout_ms` snaps to line.

use std::time::{Duration, Instant};

use super::SnapMode;

#[derive(Debug)]
pub struct ClickTracker {
    last_click: Option<(Instant, u16, u16)>,
    run_length: u32,
    double_click_timeout: Duration,
    triple_click_timeout: Duration,
}

impl ClickTracker {
    #[must_use]
    pub fn new(double_click_timeout: Duration, triple_click_timeout: Duration) -> Self {
        Self { last_click: None, run_length: 0, double_click_timeout, triple_click_timeout }
    }

    /// Registers a button-press at `(x, y)` at time `now` and returns the
    /// snap mode that applies to it.
    pub fn register(&mut self, now: Instant, x: u16, y: u16) -> SnapMode {
        let timeout = match self.run_length {
            0 => self.double_click_timeout,
            _ => self.triple_click_timeout,
        };

        let same_spot_in_time = self
            .last_click
            .is_some_and(|(at, lx, ly)| lx == x && ly == y && now.saturating_duration_since(at) <= timeout);

        self.run_length = if same_spot_in_time { self.run_length + 1 } else { 0 };
        self.last_click = Some((now, x, y));

        match self.run_length {
            0 => SnapMode::None,
            1 => SnapMode::Word,
            _ => SnapMode::Line,
        }
    }

    pub fn reset(&mut self) {
        self.last_click = None;
        self.run_length = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_click_has_no_snap() {
        let mut tracker = ClickTracker::new(Duration::from_millis(300), Duration::from_millis(600));
        assert_eq!(tracker.register(Instant::now(), 1, 1), SnapMode::None);
    }

    #[test]
    fn second_click_in_window_snaps_to_word() {
        let mut tracker = ClickTracker::new(Duration::from_millis(300), Duration::from_millis(600));
        let t0 = Instant::now();
        tracker.register(t0, 1, 1);
        assert_eq!(tracker.register(t0 + Duration::from_millis(50), 1, 1), SnapMode::Word);
    }

    #[test]
    fn third_click_in_window_snaps_to_line() {
        let mut tracker = ClickTracker::new(Duration::from_millis(300), Duration::from_millis(600));
        let t0 = Instant::now();
        tracker.register(t0, 1, 1);
        tracker.register(t0 + Duration::from_millis(50), 1, 1);
        assert_eq!(tracker.register(t0 + Duration::from_millis(100), 1, 1), SnapMode::Line);
    }

    #[test]
    fn click_elsewhere_resets_the_run() {
        let mut tracker = ClickTracker::new(Duration::from_millis(300), Duration::from_millis(600));
        let t0 = Instant::now();
        tracker.register(t0, 1, 1);
        assert_eq!(tracker.register(t0 + Duration::from_millis(50), 9, 9), SnapMode::None);
    }

    #[test]
    fn click_after_timeout_resets_the_run() {
        let mut tracker = ClickTracker::new(Duration::from_millis(300), Duration::from_millis(600));
        let t0 = Instant::now();
        tracker.register(t0, 1, 1);
        assert_eq!(tracker.register(t0 + Duration::from_millis(400), 1, 1), SnapMode::None);
    }
}
