use std::time::Duration;

/// Enforces the minimum inter-render interval requested by PACE bytes.
///
/// Models a serial baud-rate limit: a stream can ask that downstream byte
/// consumption not outrun the display's (simulated) refresh rate. One
/// configuration value, no other state. Pacing blocks only the byte-feeding
/// path; frames already computed can be presented concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    interval: Duration,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Blocks the calling thread for one interval.
    pub fn pace(&self) {
        std::thread::sleep(self.interval);
    }
}

impl Default for Pacer {
    /// One tick of a 60 Hz refresh.
    fn default() -> Self {
        Self::new(Duration::from_micros(16_667))
    }
}
