use std::error::Error as StdError;
use std::time::Duration;

use tracing::debug;

use crate::classify::{classify, FailureClass};
use crate::clock::Clock;
use crate::exponential::{ExponentialRetryPolicy, RetryConfig};
use crate::policy::{RetryDecision, RetryPolicy};

/// Retry policy for operations that must not be replayed once the server may
/// have applied them, such as appends or concatenations.
///
/// Only 401 and 429 are retried: in both cases the server turned the request
/// away before acting on it. Server errors, request timeouts and transport
/// failures are surfaced. Granted retries follow the exponential schedule of
/// [`ExponentialRetryPolicy`].
#[derive(Debug)]
pub struct NonIdempotentRetryPolicy<C> {
    inner: ExponentialRetryPolicy<C>,
}

impl<C> NonIdempotentRetryPolicy<C>
where
    C: Clock + Default,
{
    pub fn new(max_retries: u32, interval: Duration) -> Self {
        NonIdempotentRetryPolicy {
            inner: ExponentialRetryPolicy::new(max_retries, interval),
        }
    }

    pub fn from_config(config: RetryConfig) -> Self {
        NonIdempotentRetryPolicy {
            inner: ExponentialRetryPolicy::from_config(config),
        }
    }
}

impl<C> Default for NonIdempotentRetryPolicy<C>
where
    C: Clock + Default,
{
    fn default() -> Self {
        NonIdempotentRetryPolicy {
            inner: ExponentialRetryPolicy::default(),
        }
    }
}

impl<C: Clock> NonIdempotentRetryPolicy<C> {
    pub fn with_clock(max_retries: u32, interval: Duration, clock: C) -> Self {
        NonIdempotentRetryPolicy {
            inner: ExponentialRetryPolicy::with_clock(max_retries, interval, clock),
        }
    }

    pub fn retry_count(&self) -> u32 {
        self.inner.retry_count()
    }

    pub fn clock(&self) -> &C {
        &self.inner.clock
    }
}

impl<C: Clock> RetryPolicy for NonIdempotentRetryPolicy<C> {
    fn decide(
        &mut self,
        status: Option<u16>,
        error: Option<&(dyn StdError + 'static)>,
    ) -> RetryDecision {
        match classify(status, error) {
            FailureClass::TransientClient(401) | FailureClass::TransientClient(429) => {
                self.inner.decide(status, error)
            }
            class => {
                debug!(?class, "not replaying a non-idempotent request");
                RetryDecision::NotRetryable
            }
        }
    }

    fn reset(&mut self) {
        self.inner.reset()
    }

    fn wait(&self, dur: Duration) {
        self.inner.wait(dur)
    }
}
