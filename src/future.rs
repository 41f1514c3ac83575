use std::{
    error,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use futures_core::ready;
use pin_project::pin_project;

use crate::error::{Failure, RetryError};
use crate::policy::RetryPolicy;
use crate::retry::{give_up, NoopNotify, Notify};

/// Sleeper produces the timer future awaited between attempts.
pub trait Sleeper {
    type Sleep: Future<Output = ()> + Send + 'static;
    fn sleep(&self, dur: Duration) -> Self::Sleep;
}

/// Retries given `operation` according to the [`RetryPolicy`], awaiting the
/// runtime's timer between attempts instead of blocking.
/// The returned future can be spawned onto a compatible runtime.
///
/// Only available through the `tokio` and `async-std` feature flags.
///
/// # Example
///
/// ```rust
/// # extern crate tokio_1 as tokio;
/// use std::io;
/// use store_retry::{ExponentialRetryPolicy, Failure, RetryError};
///
/// async fn f() -> Result<(), Failure<io::Error>> {
///     // Business logic...
///     Err(Failure::http(404))
/// }
///
/// # #[tokio::main]
/// # async fn main() {
/// let err = store_retry::future::retry(ExponentialRetryPolicy::default(), f).await.err().unwrap();
/// assert!(matches!(err, RetryError::NotRetryable(_)));
/// # }
/// ```
#[cfg(any(feature = "tokio", feature = "async-std"))]
pub fn retry<P, T, E, Fn, Fut>(policy: P, operation: Fn) -> Retry<impl Sleeper, P, NoopNotify, Fn, Fut>
where
    P: RetryPolicy,
    Fn: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Failure<E>>>,
    E: error::Error + 'static,
{
    retry_notify(policy, operation, NoopNotify)
}

/// Retries given `operation` according to the [`RetryPolicy`].
/// Calls `notify` on failed attempts that will be retried.
///
/// Only available through the `tokio` and `async-std` feature flags.
///
/// # Async `notify`
///
/// `notify` can be neither `async fn` or [`Future`]. If you need to perform some async
/// operations inside `notify`, consider using your runtimes task-spawning functionality.
#[cfg(any(feature = "tokio", feature = "async-std"))]
pub fn retry_notify<P, T, E, Fn, Fut, N>(
    policy: P,
    operation: Fn,
    notify: N,
) -> Retry<impl Sleeper, P, N, Fn, Fut>
where
    P: RetryPolicy,
    Fn: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Failure<E>>>,
    E: error::Error + 'static,
    N: Notify<E>,
{
    Retry::new(rt_sleeper(), policy, notify, operation)
}

/// Same as [`retry_notify`] with a caller-supplied [`Sleeper`], for runtimes
/// this crate has no feature flag for.
pub fn retry_with_sleeper<S, P, T, E, Fn, Fut, N>(
    sleeper: S,
    policy: P,
    operation: Fn,
    notify: N,
) -> Retry<S, P, N, Fn, Fut>
where
    S: Sleeper,
    P: RetryPolicy,
    Fn: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Failure<E>>>,
    E: error::Error + 'static,
    N: Notify<E>,
{
    Retry::new(sleeper, policy, notify, operation)
}

/// Retry implementation.
///
/// The policy only ever sees [`RetryPolicy::decide`]; its blocking
/// [`wait`](RetryPolicy::wait) is never called. Dropping the future while it
/// waits cancels the pending retry, and the policy's state stays as decided.
#[pin_project]
pub struct Retry<S: Sleeper, P, N, Fn, Fut> {
    /// The [`Sleeper`] that we generate the delay futures from.
    sleeper: S,

    /// [`RetryPolicy`] consulted after every failed attempt.
    policy: P,

    /// Either the attempt in flight or the delay before the next one.
    #[pin]
    state: State<Fut, S::Sleep>,

    /// Operation to be retried. It must return [`Future`].
    operation: Fn,

    /// [`Notify`] implementation to track [`Retry`] ticks.
    notify: N,
}

impl<S, P, N, Fn, Fut, T, E> Retry<S, P, N, Fn, Fut>
where
    S: Sleeper,
    Fn: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Failure<E>>>,
{
    pub fn new(sleeper: S, policy: P, notify: N, mut operation: Fn) -> Self {
        let fut = operation();
        Retry {
            sleeper,
            policy,
            state: State::Attempt(fut),
            operation,
            notify,
        }
    }
}

// The next attempt is only created once its delay has elapsed.
#[pin_project(project = StateProj)]
enum State<Fut, Sleep> {
    Attempt(#[pin] Fut),
    Delay(#[pin] Sleep),
}

impl<S, P, N, Fn, Fut, T, E> Future for Retry<S, P, N, Fn, Fut>
where
    S: Sleeper,
    P: RetryPolicy,
    N: Notify<E>,
    Fn: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Failure<E>>>,
    E: error::Error + 'static,
{
    type Output = Result<T, RetryError<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        loop {
            let failure = match this.state.as_mut().project() {
                StateProj::Delay(delay) => {
                    ready!(delay.poll(cx));
                    this.state.set(State::Attempt((this.operation)()));
                    continue;
                }
                StateProj::Attempt(fut) => match ready!(fut.poll(cx)) {
                    Ok(v) => return Poll::Ready(Ok(v)),
                    Err(failure) => failure,
                },
            };

            let decision = this.policy.decide(failure.status, failure.cause());
            match give_up(decision, failure) {
                Ok((failure, wait)) => {
                    this.notify.notify(failure, wait);
                    this.state.set(State::Delay(this.sleeper.sleep(wait)));
                }
                Err(err) => return Poll::Ready(Err(err)),
            }
        }
    }
}

#[cfg(all(feature = "tokio", feature = "async-std"))]
compile_error!("Feature \"tokio\" and \"async-std\" cannot be enabled at the same time");

#[cfg(feature = "async-std")]
fn rt_sleeper() -> impl Sleeper {
    AsyncStdSleeper
}

#[cfg(feature = "tokio")]
fn rt_sleeper() -> impl Sleeper {
    TokioSleeper
}

#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
struct TokioSleeper;

#[cfg(feature = "tokio")]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
impl Sleeper for TokioSleeper {
    type Sleep = ::tokio_1::time::Sleep;
    fn sleep(&self, dur: Duration) -> Self::Sleep {
        ::tokio_1::time::sleep(dur)
    }
}

#[cfg(feature = "async-std")]
#[cfg_attr(docsrs, doc(cfg(feature = "async-std")))]
struct AsyncStdSleeper;

#[cfg(feature = "async-std")]
#[cfg_attr(docsrs, doc(cfg(feature = "async-std")))]
impl Sleeper for AsyncStdSleeper {
    type Sleep = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
    fn sleep(&self, dur: Duration) -> Self::Sleep {
        Box::pin(::async_std_1::task::sleep(dur))
    }
}
