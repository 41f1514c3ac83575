use std::error::Error as StdError;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::classify::classify;
use crate::default;

/// The baseline wait shared by every policy.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(default::RETRY_INTERVAL_MILLIS);

/// Verdict for one failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Re-issue the request once the given delay has elapsed.
    RetryAfter(Duration),
    /// The failure will not go away by itself.
    NotRetryable,
    /// The failure was retryable but the retry budget is spent.
    Exhausted { retries: u32 },
}

impl RetryDecision {
    pub fn is_retry(&self) -> bool {
        matches!(self, RetryDecision::RetryAfter(_))
    }
}

/// `RetryPolicy` decides whether a failed attempt of one logical operation
/// should be issued again, and how long to wait first.
///
/// A policy accumulates state across the attempts of a single operation; use a
/// fresh instance (or [`reset`](RetryPolicy::reset)) for every new operation.
/// Implementations are not synchronized.
pub trait RetryPolicy {
    /// Decide on a failed attempt without waiting.
    ///
    /// State changes (retry count, next interval) happen here, so a caller that
    /// abandons the subsequent wait leaves the policy consistent.
    fn decide(
        &mut self,
        status: Option<u16>,
        error: Option<&(dyn StdError + 'static)>,
    ) -> RetryDecision;

    /// Puts the policy back into its initial state.
    fn reset(&mut self) {}

    /// Blocks the calling thread for `dur`.
    fn wait(&self, dur: Duration) {
        thread::sleep(dur)
    }

    /// Decides on a failed attempt and, when a retry is granted, blocks for the
    /// backoff interval before returning `true`.
    ///
    /// `false` covers both non-retryable failures and an exhausted budget; use
    /// [`decide`](RetryPolicy::decide) to tell them apart.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use store_retry::{ExponentialRetryPolicy, RetryPolicy};
    ///
    /// let mut policy = ExponentialRetryPolicy::new(1, Duration::from_millis(1));
    /// assert!(policy.should_retry(Some(503), None));
    /// assert!(!policy.should_retry(Some(503), None));
    /// ```
    fn should_retry(
        &mut self,
        status: Option<u16>,
        error: Option<&(dyn StdError + 'static)>,
    ) -> bool {
        match self.decide(status, error) {
            RetryDecision::RetryAfter(dur) => {
                self.wait(dur);
                true
            }
            RetryDecision::NotRetryable | RetryDecision::Exhausted { .. } => false,
        }
    }
}

impl<P: RetryPolicy + ?Sized> RetryPolicy for Box<P> {
    fn decide(
        &mut self,
        status: Option<u16>,
        error: Option<&(dyn StdError + 'static)>,
    ) -> RetryDecision {
        (**self).decide(status, error)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn wait(&self, dur: Duration) {
        (**self).wait(dur)
    }
}

impl<P: RetryPolicy + ?Sized> RetryPolicy for &mut P {
    fn decide(
        &mut self,
        status: Option<u16>,
        error: Option<&(dyn StdError + 'static)>,
    ) -> RetryDecision {
        (**self).decide(status, error)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn wait(&self, dur: Duration) {
        (**self).wait(dur)
    }
}

/// Policy that never retries.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRetryPolicy;

impl RetryPolicy for NoRetryPolicy {
    fn decide(
        &mut self,
        status: Option<u16>,
        error: Option<&(dyn StdError + 'static)>,
    ) -> RetryDecision {
        let class = classify(status, error);
        debug!(?class, "retries disabled");
        if class.is_retryable() {
            RetryDecision::Exhausted { retries: 0 }
        } else {
            RetryDecision::NotRetryable
        }
    }
}
