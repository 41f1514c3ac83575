use std::time::Duration;

use store_retry::{NonIdempotentRetryPolicy, RetryDecision, RetryPolicy};
use tracing_subscriber::EnvFilter;

// Replays a canned sequence of append responses against the policy.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut policy = NonIdempotentRetryPolicy::new(4, Duration::from_millis(50));
    for status in [429u16, 401, 503].iter().copied() {
        match policy.decide(Some(status), None) {
            RetryDecision::RetryAfter(dur) => {
                println!("HTTP {}: appending again in {:?}", status, dur);
                policy.wait(dur);
            }
            RetryDecision::NotRetryable => {
                println!("HTTP {}: append may have been applied, surfacing", status);
                break;
            }
            RetryDecision::Exhausted { retries } => {
                println!("HTTP {}: gave up after {} retries", status, retries);
                break;
            }
        }
    }
}
