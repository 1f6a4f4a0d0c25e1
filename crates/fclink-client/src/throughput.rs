use std::time::{Duration, Instant};

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Accumulates bytes processed and yields a bytes/sec figure once per
/// reporting window. Purely diagnostic.
pub(crate) struct ThroughputMeter {
    bytes: u64,
    window_start: Instant,
}

impl ThroughputMeter {
    pub fn new() -> Self {
        Self {
            bytes: 0,
            window_start: Instant::now(),
        }
    }

    /// Record processed bytes; returns `Some(bytes_per_sec)` when the
    /// current window has elapsed.
    pub fn record(&mut self, bytes: usize) -> Option<f64> {
        self.bytes += bytes as u64;
        self.tick(Instant::now())
    }

    fn tick(&mut self, now: Instant) -> Option<f64> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < REPORT_INTERVAL {
            return None;
        }
        let rate = self.bytes as f64 / elapsed.as_secs_f64();
        self.bytes = 0;
        self.window_start = now;
        Some(rate)
    }
}
