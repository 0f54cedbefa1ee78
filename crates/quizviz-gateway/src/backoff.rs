//! Exponential backoff with jitter

use std::time::Duration;

use rand::Rng;

/// Exponential backoff calculator: `base × 2^attempt`, capped at a maximum,
/// with ±10% jitter so synchronized retries spread out.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    base_delay: Duration,
    max_delay: Duration,
    attempt: u32,
}

impl ExponentialBackoff {
    pub fn new(base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            base_delay,
            max_delay,
            attempt: 0,
        }
    }

    /// Delay before the next retry; advances the attempt counter.
    pub fn next_delay(&mut self) -> Duration {
        let exponential = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(self.attempt));
        let capped = exponential.min(self.max_delay);
        self.attempt = self.attempt.saturating_add(1);

        let jitter = rand::thread_rng().gen_range(0.9..=1.1);
        Duration::from_secs_f64(capped.as_secs_f64() * jitter)
    }

    /// Attempts consumed so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_increase() {
        let mut backoff =
            ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(60));
        let first = backoff.next_delay();
        let second = backoff.next_delay();
        let third = backoff.next_delay();
        // With ±10% jitter and a 2x multiplier the ordering is strict
        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn test_delay_is_capped() {
        let mut backoff =
            ExponentialBackoff::new(Duration::from_millis(100), Duration::from_millis(300));
        for _ in 0..10 {
            let delay = backoff.next_delay();
            assert!(delay <= Duration::from_millis(330));
        }
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let mut backoff =
            ExponentialBackoff::new(Duration::from_millis(1000), Duration::from_secs(60));
        let delay = backoff.next_delay();
        assert!(delay >= Duration::from_millis(900));
        assert!(delay <= Duration::from_millis(1100));
    }

    #[test]
    fn test_reset() {
        let mut backoff =
            ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(60));
        backoff.next_delay();
        backoff.next_delay();
        assert_eq!(backoff.attempt(), 2);
        backoff.reset();
        assert_eq!(backoff.attempt(), 0);
    }
}
