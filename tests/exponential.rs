extern crate store_retry;

use assert_matches::assert_matches;
use rstest::rstest;
use store_retry::exponential::ExponentialRetryPolicy;
use store_retry::{Clock, RetryDecision, RetryPolicy, DEFAULT_RETRY_INTERVAL};

use std::cell::RefCell;
use std::io;
use std::time::Duration;

/// Records every wait instead of sleeping.
#[derive(Default)]
struct TestClock(RefCell<Vec<Duration>>);

impl TestClock {
    fn waits(&self) -> Vec<Duration> {
        self.0.borrow().clone()
    }
}

impl Clock for TestClock {
    fn sleep(&self, dur: Duration) {
        self.0.borrow_mut().push(dur);
    }
}

fn policy(max_retries: u32, interval_ms: u64) -> ExponentialRetryPolicy<TestClock> {
    ExponentialRetryPolicy::new(max_retries, Duration::from_millis(interval_ms))
}

fn ms(v: &[u64]) -> Vec<Duration> {
    v.iter().map(|&ms| Duration::from_millis(ms)).collect()
}

#[test]
fn default_policy_retries_503_four_times() {
    let mut exp = ExponentialRetryPolicy::<TestClock>::default();

    let results = (0..5)
        .map(|_| exp.should_retry(Some(503), None))
        .collect::<Vec<_>>();

    assert_eq!(results, vec![true, true, true, true, false]);
    assert_eq!(exp.clock.waits(), ms(&[1_000, 4_000, 16_000, 64_000]));
    assert_eq!(exp.retry_count(), 4);
}

#[test]
fn waits_before_each_granted_retry_only() {
    let mut exp = policy(2, 100);

    assert!(exp.should_retry(Some(429), None));
    assert_eq!(exp.clock.waits(), ms(&[100]));
    assert!(exp.should_retry(Some(429), None));
    assert_eq!(exp.clock.waits(), ms(&[100, 400]));
    assert!(!exp.should_retry(Some(429), None));
    assert_eq!(exp.clock.waits(), ms(&[100, 400]));
}

#[test]
fn not_implemented_fails_fast() {
    let mut exp = ExponentialRetryPolicy::<TestClock>::default();

    assert!(!exp.should_retry(Some(501), None));
    assert!(exp.clock.waits().is_empty());
    assert_eq!(exp.retry_count(), 0);
    assert_eq!(exp.current_interval(), DEFAULT_RETRY_INTERVAL);
}

#[rstest]
#[case(500)]
#[case(502)]
#[case(503)]
#[case(504)]
#[case(507)]
#[case(599)]
#[case(401)]
#[case(408)]
#[case(429)]
fn retryable_status_granted_on_fresh_policy(#[case] status: u16) {
    let mut exp = policy(4, 10);
    assert!(exp.should_retry(Some(status), None));
    assert_eq!(exp.retry_count(), 1);
}

#[rstest]
#[case(200)]
#[case(204)]
#[case(304)]
#[case(400)]
#[case(403)]
#[case(404)]
#[case(409)]
#[case(501)]
#[case(505)]
fn permanent_status_leaves_state_untouched(#[case] status: u16) {
    let mut exp = policy(4, 10);
    assert_eq!(exp.decide(Some(status), None), RetryDecision::NotRetryable);
    assert_eq!(exp.retry_count(), 0);
    assert_eq!(exp.current_interval(), Duration::from_millis(10));
    assert!(exp.clock.waits().is_empty());
}

#[test]
fn transport_failure_is_retried_while_budget_remains() {
    let mut exp = policy(2, 10);
    let err = io::Error::new(io::ErrorKind::TimedOut, "operation timed out");

    assert!(exp.should_retry(None, Some(&err)));
    assert!(exp.should_retry(None, Some(&err)));
    assert!(!exp.should_retry(None, Some(&err)));
}

#[test]
fn nothing_observed_is_not_retried() {
    let mut exp = policy(2, 10);
    assert!(!exp.should_retry(None, None));
    assert_eq!(exp.retry_count(), 0);
}

#[test]
fn max_retries_is_exact() {
    for n in 0..6 {
        let mut exp = policy(n, 1);
        for _ in 0..n {
            assert!(exp.should_retry(Some(500), None));
        }
        assert!(!exp.should_retry(Some(500), None));
        assert_eq!(exp.retry_count(), n);
    }
}

#[test]
fn wait_before_kth_retry_grows_by_four() {
    let mut exp = policy(6, 3);
    for k in 1..=6u32 {
        let expected = Duration::from_millis(3 * 4u64.pow(k - 1));
        assert_eq!(exp.decide(Some(500), None), RetryDecision::RetryAfter(expected));
    }
}

#[test]
fn interval_never_decreases() {
    let mut exp = policy(8, 1);
    let mut last = exp.current_interval();
    for status in [500u16, 404, 429, 501, 503, 200, 408, 401].iter().copied() {
        exp.decide(Some(status), None);
        assert!(exp.current_interval() >= last);
        last = exp.current_interval();
    }
}

#[test]
fn exhaustion_is_distinguishable_from_permanent_failure() {
    let mut exp = policy(1, 1);

    assert_matches!(exp.decide(Some(503), None), RetryDecision::RetryAfter(_));
    assert_eq!(exp.decide(Some(503), None), RetryDecision::Exhausted { retries: 1 });
    // Still a plain "not retryable" once the budget is spent.
    assert_eq!(exp.decide(Some(404), None), RetryDecision::NotRetryable);
    assert!(!exp.should_retry(Some(404), None));
    assert!(!exp.should_retry(Some(503), None));
}

#[test]
fn exhausted_policy_does_not_change() {
    let mut exp = policy(1, 5);
    assert!(exp.should_retry(Some(500), None));
    let interval = exp.current_interval();

    assert!(!exp.should_retry(Some(500), None));
    assert!(!exp.should_retry(Some(500), None));
    assert_eq!(exp.retry_count(), 1);
    assert_eq!(exp.current_interval(), interval);
    assert_eq!(exp.clock.waits(), ms(&[5]));
}

#[test]
fn reset_starts_over() {
    let mut exp = policy(2, 10);
    assert!(exp.should_retry(Some(500), None));
    assert!(exp.should_retry(Some(500), None));
    assert!(!exp.should_retry(Some(500), None));

    exp.reset();
    assert_eq!(exp.retry_count(), 0);
    assert_eq!(exp.current_interval(), Duration::from_millis(10));
    assert!(exp.should_retry(Some(500), None));
    assert_eq!(exp.clock.waits(), ms(&[10, 40, 10]));
}

#[test]
fn decide_does_not_wait() {
    let mut exp = policy(3, 10);
    assert_matches!(exp.decide(Some(500), None), RetryDecision::RetryAfter(d) if d == Duration::from_millis(10));
    assert!(exp.clock.waits().is_empty());
    assert_eq!(exp.retry_count(), 1);
}

#[test]
fn policies_are_interchangeable_behind_a_box() {
    let mut policies: Vec<Box<dyn RetryPolicy>> = vec![
        Box::new(ExponentialRetryPolicy::<TestClock>::new(1, Duration::from_millis(1))),
        Box::new(store_retry::NoRetryPolicy),
    ];

    let verdicts = policies
        .iter_mut()
        .map(|p| p.decide(Some(500), None))
        .collect::<Vec<_>>();
    assert_eq!(
        verdicts,
        vec![
            RetryDecision::RetryAfter(Duration::from_millis(1)),
            RetryDecision::Exhausted { retries: 0 },
        ]
    );
}
