use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    Fixed,
    /// Multiply the interval by `factor` after every response, up to `max_interval`.
    Exponential { factor: f64, max_interval: Duration },
}

/// How often a job is polled and when polling gives up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// `None` polls until the server reports a terminal status.
    pub max_attempts: Option<u32>,
    pub backoff: Backoff,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            backoff: Backoff::Fixed,
        }
    }
}

impl PollPolicy {
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    /// Delay before the next request, given how many responses have arrived so far.
    pub fn delay_after(&self, attempts: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.interval,
            Backoff::Exponential {
                factor,
                max_interval,
            } => {
                let factor = if factor.is_finite() { factor.max(1.0) } else { 1.0 };
                let exponent = attempts.min(64) as i32;
                let secs = self.interval.as_secs_f64() * factor.powi(exponent);
                let cap = max_interval.max(self.interval);
                if !secs.is_finite() || secs >= cap.as_secs_f64() {
                    cap
                } else {
                    Duration::from_secs_f64(secs)
                }
            }
        }
    }

    pub fn is_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}
