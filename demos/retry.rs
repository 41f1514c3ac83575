use std::time::Duration;

use store_retry::{retry_notify, ExponentialRetryPolicy, Failure, RetryError};
use tracing_subscriber::EnvFilter;

fn fetch_url(url: &str) -> Result<String, RetryError<reqwest::Error>> {
    let op = || -> Result<String, Failure<reqwest::Error>> {
        println!("Fetching {}", url);
        let resp = reqwest::blocking::get(url).map_err(Failure::transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Failure::http(status.as_u16()));
        }
        resp.text().map_err(Failure::transport)
    };
    let notify = |err: Failure<reqwest::Error>, dur: Duration| {
        println!("Retrying in {:?} after: {}", dur, err);
    };

    let policy = ExponentialRetryPolicy::new(3, Duration::from_millis(200));
    retry_notify(policy, op, notify)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match fetch_url("https://httpbin.org/status/503") {
        Ok(_) => println!("Successfully fetched"),
        Err(err) => println!("Failed to fetch: {}", err),
    }
}
