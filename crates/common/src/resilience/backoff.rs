//! Backoff strategies and jitter for retry loops.
//!
//! Retries are numbered from 1. The delay before retry `n` is
//! `initial_delay * base^(n-1)`, capped at `max_delay`.

use std::time::Duration;

use rand::Rng;

/// Exponential backoff: `initial_delay * base^(retry - 1)`, capped.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffStrategy {
    pub initial_delay: Duration,
    pub base: f64,
    pub max_delay: Duration,
}

impl BackoffStrategy {
    /// Doubling backoff starting at `initial_delay`.
    pub const fn doubling(initial_delay: Duration, max_delay: Duration) -> Self {
        Self { initial_delay, base: 2.0, max_delay }
    }

    /// Delay before the given retry (1-indexed). Retry 0 means "first
    /// attempt" and never waits.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.base.powi(exponent);
        Duration::try_from_secs_f64(secs).map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

/// Jitter type for adding randomness to retry delays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Jitter {
    /// No jitter
    #[default]
    None,
    /// Full jitter: 0 to calculated_delay
    Full,
}

impl Jitter {
    /// Apply jitter to the calculated delay. The result never exceeds `delay`.
    pub fn apply(self, delay: Duration) -> Duration {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        if millis == 0 {
            return delay;
        }
        match self {
            Jitter::None => delay,
            Jitter::Full => Duration::from_millis(rand::thread_rng().gen_range(0..=millis)),
        }
    }
}

/// Retry budget plus timing for a retry loop.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Additional attempts after the first one
    pub max_retries: u32,
    pub strategy: BackoffStrategy,
    pub jitter: Jitter,
}

impl BackoffPolicy {
    pub fn new(max_retries: u32, strategy: BackoffStrategy) -> Self {
        Self { max_retries, strategy, jitter: Jitter::None }
    }

    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// Total attempts including the first one.
    pub const fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Jittered delay before the given retry (1-indexed).
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        self.jitter.apply(self.strategy.delay_for_retry(retry))
    }
}
