//! Request spacing with adaptive backoff for the catalog client.
//!
//! The iTunes Search API tolerates roughly 20 calls per minute; the
//! interval doubles after each failed call and halves back towards the
//! base after a run of successes.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};

pub struct RateLimiter {
    name: String,
    last_request: Option<Instant>,
    current_interval: Duration,
    base_interval: Duration,
    max_interval: Duration,
    success_count: u32,
    successes_to_reduce: u32,
}

impl RateLimiter {
    /// * `successes_to_reduce`: consecutive successes before halving the
    ///   interval; 0 disables the reduction.
    pub fn new(
        name: &str,
        base_interval: Duration,
        max_interval: Duration,
        successes_to_reduce: u32,
    ) -> Self {
        RateLimiter {
            name: name.to_string(),
            last_request: None,
            current_interval: base_interval,
            base_interval,
            max_interval,
            success_count: 0,
            successes_to_reduce,
        }
    }

    /// Max interval = 16× base, reduce after 10 successes.
    pub fn from_millis(name: &str, millis: u64) -> Self {
        let base = Duration::from_millis(millis);
        Self::new(name, base, base * 16, 10)
    }

    pub fn current_interval(&self) -> Duration {
        self.current_interval
    }

    /// Time still to wait before the next request may go out.
    pub fn remaining(&self) -> Duration {
        match self.last_request {
            Some(last) => self.current_interval.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Sleep if needed.  Must be called *before* making a request.
    pub fn wait_if_needed(&mut self) {
        let wait = self.remaining();
        if !wait.is_zero() {
            debug!("[{}] waiting {:.1}s before next request", self.name, wait.as_secs_f64());
            thread::sleep(wait);
        }
        self.last_request = Some(Instant::now());
    }

    pub fn report_success(&mut self) {
        if self.successes_to_reduce == 0 {
            return;
        }

        self.success_count += 1;

        if self.success_count >= self.successes_to_reduce
            && self.current_interval > self.base_interval
        {
            self.current_interval = (self.current_interval / 2).max(self.base_interval);
            debug!(
                "[{}] interval reduced to {:.1}s after {} successes",
                self.name,
                self.current_interval.as_secs_f64(),
                self.success_count
            );
            self.success_count = 0;
        }
    }

    /// Doubles the interval (up to max).
    pub fn report_failure(&mut self) {
        self.current_interval = (self.current_interval * 2).min(self.max_interval);
        info!(
            "[{}] interval increased to {:.1}s after error",
            self.name,
            self.current_interval.as_secs_f64()
        );
        self.success_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_and_recovery() {
        let mut rl = RateLimiter::new("test", Duration::from_millis(10), Duration::from_millis(40), 2);
        rl.report_failure();
        assert_eq!(rl.current_interval(), Duration::from_millis(20));
        rl.report_failure();
        rl.report_failure();
        assert_eq!(rl.current_interval(), Duration::from_millis(40));

        rl.report_success();
        assert_eq!(rl.current_interval(), Duration::from_millis(40));
        rl.report_success();
        assert_eq!(rl.current_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_first_request_does_not_wait() {
        let rl = RateLimiter::from_millis("test", 1000);
        assert_eq!(rl.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_reduction_disabled() {
        let mut rl = RateLimiter::new("test", Duration::from_millis(10), Duration::from_millis(80), 0);
        rl.report_failure();
        for _ in 0..20 {
            rl.report_success();
        }
        assert_eq!(rl.current_interval(), Duration::from_millis(20));
    }
}
