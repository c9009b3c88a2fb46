/// Source of the `HH:MM:SS` stamps shown next to events.
pub trait Clock {
    fn time_of_day(&self) -> String;
}

/// Wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn time_of_day(&self) -> String {
        chrono::Local::now().format("%H:%M:%S").to_string()
    }
}

/// Always reports the same time.
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl FixedClock {
    pub fn new(time: impl Into<String>) -> Self {
        Self(time.into())
    }
}

impl Clock for FixedClock {
    fn time_of_day(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_clock_format() {
        let stamp = LocalClock.time_of_day();
        assert_eq!(stamp.len(), 8);
        assert_eq!(stamp.matches(':').count(), 2);
    }
}
