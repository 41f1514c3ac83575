use std::error;
use std::time::Duration;

use tracing::debug;

use crate::error::{Failure, RetryError};
use crate::policy::{RetryDecision, RetryPolicy};

/// Retries given `operation` according to the [`RetryPolicy`], blocking the
/// calling thread between attempts through [`RetryPolicy::wait`].
///
/// The policy is used as-is; pass a fresh (or reset) one for every logical
/// operation.
///
/// # Examples
///
/// ```rust
/// # use std::io;
/// # use std::time::Duration;
/// use store_retry::{ExponentialRetryPolicy, Failure, RetryError};
///
/// let mut policy = ExponentialRetryPolicy::new(4, Duration::from_millis(1));
/// let f = || -> Result<(), Failure<io::Error>> { Err(Failure::http(404)) };
///
/// let err = store_retry::retry(&mut policy, f).err().unwrap();
/// assert!(matches!(err, RetryError::NotRetryable(_)));
/// ```
pub fn retry<P, F, T, E>(policy: P, operation: F) -> Result<T, RetryError<E>>
where
    P: RetryPolicy,
    F: FnMut() -> Result<T, Failure<E>>,
    E: error::Error + 'static,
{
    retry_notify(policy, operation, NoopNotify)
}

/// Retries given `operation` according to the [`RetryPolicy`].
/// Calls `notify` with the failure and the upcoming wait before every retry.
///
/// # Examples
///
/// ```rust
/// # use std::io;
/// # use std::time::Duration;
/// use store_retry::{ExponentialRetryPolicy, Failure};
///
/// let mut policy = ExponentialRetryPolicy::new(1, Duration::from_millis(1));
/// let mut calls = 0;
/// let f = || -> Result<(), Failure<io::Error>> {
///     calls += 1;
///     Err(Failure::http(503))
/// };
/// let notify = |err: Failure<io::Error>, dur: Duration| {
///     println!("Error happened at {:?}: {}", dur, err);
/// };
///
/// let err = store_retry::retry_notify(&mut policy, f, notify).err().unwrap();
/// assert!(err.is_exhausted());
/// assert_eq!(calls, 2);
/// ```
pub fn retry_notify<P, F, N, T, E>(
    mut policy: P,
    mut operation: F,
    mut notify: N,
) -> Result<T, RetryError<E>>
where
    P: RetryPolicy,
    F: FnMut() -> Result<T, Failure<E>>,
    N: Notify<E>,
    E: error::Error + 'static,
{
    loop {
        let failure = match operation() {
            Ok(v) => return Ok(v),
            Err(failure) => failure,
        };

        let decision = policy.decide(failure.status, failure.cause());
        match give_up(decision, failure) {
            Ok((failure, wait)) => {
                notify.notify(failure, wait);
                policy.wait(wait);
            }
            Err(err) => return Err(err),
        }
    }
}

/// Turns a non-retry decision into the driver's error, otherwise hands the
/// failure back with the wait to observe.
pub(crate) fn give_up<E>(
    decision: RetryDecision,
    failure: Failure<E>,
) -> Result<(Failure<E>, Duration), RetryError<E>> {
    match decision {
        RetryDecision::RetryAfter(wait) => Ok((failure, wait)),
        RetryDecision::NotRetryable => Err(RetryError::NotRetryable(failure)),
        RetryDecision::Exhausted { retries } => {
            debug!(retries, status = ?failure.status, "giving up");
            Err(RetryError::Exhausted { retries, failure })
        }
    }
}

/// Notify is called in [`retry_notify`] before every wait.
pub trait Notify<E> {
    fn notify(&mut self, err: Failure<E>, duration: Duration);
}

impl<E, F> Notify<E> for F
where
    F: FnMut(Failure<E>, Duration),
{
    fn notify(&mut self, err: Failure<E>, duration: Duration) {
        self(err, duration)
    }
}

/// No-op implementation of [`Notify`]. Literally does nothing.
#[derive(Debug, Clone, Copy)]
pub struct NoopNotify;

impl<E> Notify<E> for NoopNotify {
    fn notify(&mut self, _: Failure<E>, _: Duration) {}
}
