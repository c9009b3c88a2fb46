use std::time::{Duration, Instant};

/// Repeating deadline polled by the UI loop.
///
/// A ticker that fell behind fires once and re-arms relative to `now`; it
/// never replays missed periods.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Instant,
}

impl Ticker {
    /// First firing happens one full period after `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    /// Returns `true` when the deadline has passed, re-arming the ticker.
    pub fn fire(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.period;
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_period() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(1200), start);

        assert!(!ticker.fire(start));
        assert!(!ticker.fire(start + Duration::from_millis(1199)));
        assert!(ticker.fire(start + Duration::from_millis(1200)));
        assert!(!ticker.fire(start + Duration::from_millis(1300)));
        assert!(ticker.fire(start + Duration::from_millis(2400)));
    }

    #[test]
    fn does_not_replay_missed_periods() {
        let start = Instant::now();
        let mut ticker = Ticker::new(Duration::from_millis(100), start);

        let late = start + Duration::from_millis(1_000);
        assert!(ticker.fire(late));
        assert!(!ticker.fire(late));
        assert!(!ticker.fire(late + Duration::from_millis(99)));
        assert!(ticker.fire(late + Duration::from_millis(100)));
    }
}
