use std::error::Error as StdError;
use std::time::Duration;

use tracing::{debug, warn};

use crate::classify::classify;
use crate::clock::Clock;
use crate::default;
use crate::policy::{RetryDecision, RetryPolicy, DEFAULT_RETRY_INTERVAL};

/// Construction options for [`ExponentialRetryPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Number of retries granted after the first attempt.
    pub max_retries: u32,
    /// The wait before the first retry.
    pub initial_interval: Duration,
}

impl Default for RetryConfig {
    fn default() -> RetryConfig {
        RetryConfig {
            max_retries: default::MAX_RETRIES,
            initial_interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> RetryConfig {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_interval(mut self, initial_interval: Duration) -> RetryConfig {
        self.initial_interval = initial_interval;
        self
    }
}

/// Exponential retry policy.
///
/// Retries 5xx statuses except 501 and 505, the 401, 408 and 429 statuses, and
/// attempts that failed without any response. The wait before the k-th retry
/// is `initial_interval * 4^(k-1)`; there is no upper bound on the interval
/// other than `Duration::MAX`, so large `max_retries` values mean very long
/// waits.
#[derive(Debug)]
pub struct ExponentialRetryPolicy<C> {
    retry_count: u32,
    max_retries: u32,
    exponential_factor: u32,
    initial_interval: Duration,
    current_interval: Duration,
    /// The clock used to wait between attempts.
    pub clock: C,
}

impl<C> ExponentialRetryPolicy<C>
where
    C: Clock + Default,
{
    /// Policy with the given retry ceiling and initial wait.
    pub fn new(max_retries: u32, interval: Duration) -> Self {
        Self::with_clock(max_retries, interval, C::default())
    }

    pub fn from_config(config: RetryConfig) -> Self {
        Self::new(config.max_retries, config.initial_interval)
    }
}

impl<C> Default for ExponentialRetryPolicy<C>
where
    C: Clock + Default,
{
    fn default() -> ExponentialRetryPolicy<C> {
        ExponentialRetryPolicy::from_config(RetryConfig::default())
    }
}

impl<C: Clock> ExponentialRetryPolicy<C> {
    pub fn with_clock(max_retries: u32, interval: Duration, clock: C) -> Self {
        ExponentialRetryPolicy {
            retry_count: 0,
            max_retries,
            exponential_factor: default::EXPONENTIAL_FACTOR,
            initial_interval: interval,
            current_interval: interval,
            clock,
        }
    }

    /// Retries granted so far.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Retries still available.
    pub fn remaining(&self) -> u32 {
        self.max_retries.saturating_sub(self.retry_count)
    }

    /// The wait the next granted retry will use.
    pub fn current_interval(&self) -> Duration {
        self.current_interval
    }
}

impl<C: Clock> RetryPolicy for ExponentialRetryPolicy<C> {
    fn decide(
        &mut self,
        status: Option<u16>,
        error: Option<&(dyn StdError + 'static)>,
    ) -> RetryDecision {
        let class = classify(status, error);
        if !class.is_retryable() {
            debug!(?class, "failure is not retryable");
            return RetryDecision::NotRetryable;
        }
        if self.retry_count >= self.max_retries {
            warn!(?class, retries = self.retry_count, "retry budget exhausted");
            return RetryDecision::Exhausted {
                retries: self.retry_count,
            };
        }

        let wait = self.current_interval;
        self.current_interval = self.current_interval.saturating_mul(self.exponential_factor);
        self.retry_count += 1;
        debug!(
            ?class,
            retry = self.retry_count,
            max_retries = self.max_retries,
            ?wait,
            "retrying"
        );
        RetryDecision::RetryAfter(wait)
    }

    fn reset(&mut self) {
        self.retry_count = 0;
        self.current_interval = self.initial_interval;
    }

    fn wait(&self, dur: Duration) {
        self.clock.sleep(dur)
    }
}
