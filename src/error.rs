use std::error;
use std::fmt;

use thiserror::Error;

/// What a single failed attempt produced: the HTTP status, if a response
/// arrived, and the failure cause, if one was captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure<E> {
    pub status: Option<u16>,
    pub error: Option<E>,
}

impl<E> Failure<E> {
    pub fn new(status: Option<u16>, error: Option<E>) -> Self {
        Failure { status, error }
    }

    /// A response arrived with a failing status.
    pub fn http(status: u16) -> Self {
        Failure {
            status: Some(status),
            error: None,
        }
    }

    /// No response arrived.
    pub fn transport(err: E) -> Self {
        Failure {
            status: None,
            error: Some(err),
        }
    }

    pub fn with_error(mut self, err: E) -> Self {
        self.error = Some(err);
        self
    }
}

impl<E> Failure<E>
where
    E: error::Error + 'static,
{
    pub(crate) fn cause(&self) -> Option<&(dyn error::Error + 'static)> {
        self.error.as_ref().map(|e| e as &(dyn error::Error + 'static))
    }
}

impl<E> fmt::Display for Failure<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status, &self.error) {
            (Some(status), Some(err)) => write!(f, "HTTP {}: {}", status, err),
            (Some(status), None) => write!(f, "HTTP {}", status),
            (None, Some(err)) => write!(f, "{}", err),
            (None, None) => f.write_str("unknown failure"),
        }
    }
}

/// Final outcome of an operation the retry drivers gave up on.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The last failure was not worth retrying.
    #[error("non-retryable failure: {0}")]
    NotRetryable(Failure<E>),
    /// The failures were retryable but the policy ran out of retries.
    #[error("gave up after {retries} retries: {failure}")]
    Exhausted { retries: u32, failure: Failure<E> },
}

impl<E> RetryError<E> {
    pub fn failure(&self) -> &Failure<E> {
        match self {
            RetryError::NotRetryable(failure) => failure,
            RetryError::Exhausted { failure, .. } => failure,
        }
    }

    pub fn into_failure(self) -> Failure<E> {
        match self {
            RetryError::NotRetryable(failure) => failure,
            RetryError::Exhausted { failure, .. } => failure,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }
}
