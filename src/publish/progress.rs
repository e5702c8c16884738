use std::time::Duration;

/// Progress lines go out for the first record and then every 10th.
pub fn is_report_point(position: usize) -> bool {
    position == 1 || position % 10 == 0
}

/// Throughput and remaining-time estimate from wall time so far.
#[derive(Debug, Clone, Copy)]
pub struct Throughput {
    pub done: usize,
    pub total: usize,
    pub elapsed: Duration,
}

impl Throughput {
    /// Records per second; zero until time has passed.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.done as f64 / secs
        } else {
            0.0
        }
    }

    pub fn eta(&self) -> Duration {
        let rate = self.rate();
        if rate > 0.0 {
            Duration::from_secs_f64(self.total.saturating_sub(self.done) as f64 / rate)
        } else {
            Duration::ZERO
        }
    }
}
