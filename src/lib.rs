#![cfg_attr(docsrs, feature(doc_cfg))]

//! Retry policies for storage-service clients.
//!
//! After a failed request the caller hands the observed HTTP status (if a
//! response arrived) and the failure cause (if one was captured) to a
//! [`RetryPolicy`]. The policy classifies the failure, tracks the retry budget
//! of the logical operation and computes the wait before the next attempt.
//!
//! ```rust
//! use std::time::Duration;
//! use store_retry::{ExponentialRetryPolicy, RetryDecision, RetryPolicy};
//!
//! let mut policy = ExponentialRetryPolicy::new(2, Duration::from_millis(100));
//!
//! assert_eq!(policy.decide(Some(429), None), RetryDecision::RetryAfter(Duration::from_millis(100)));
//! assert_eq!(policy.decide(Some(429), None), RetryDecision::RetryAfter(Duration::from_millis(400)));
//! assert_eq!(policy.decide(Some(429), None), RetryDecision::Exhausted { retries: 2 });
//! assert_eq!(policy.decide(Some(404), None), RetryDecision::NotRetryable);
//! ```
//!
//! [`RetryPolicy::should_retry`] is the blocking form: it sleeps for the
//! backoff interval before answering `true`. With the `tokio` or `async-std`
//! feature, [`future::retry`] awaits the runtime's timer instead.

pub mod classify;
mod clock;
pub mod default;
mod error;
pub mod exponential;
#[cfg(feature = "futures")]
#[cfg_attr(docsrs, doc(cfg(feature = "futures")))]
pub mod future;
pub mod non_idempotent;
mod policy;
mod retry;

pub use classify::FailureClass;
pub use clock::{Clock, SystemClock};
pub use error::{Failure, RetryError};
pub use exponential::RetryConfig;
pub use policy::{NoRetryPolicy, RetryDecision, RetryPolicy, DEFAULT_RETRY_INTERVAL};
pub use retry::{retry, retry_notify, NoopNotify, Notify};

pub type ExponentialRetryPolicy = exponential::ExponentialRetryPolicy<SystemClock>;
pub type NonIdempotentRetryPolicy = non_idempotent::NonIdempotentRetryPolicy<SystemClock>;
