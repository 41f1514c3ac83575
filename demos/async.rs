extern crate tokio_1 as tokio;

use std::time::Duration;

use store_retry::future::retry;
use store_retry::{ExponentialRetryPolicy, Failure, RetryError};
use tracing_subscriber::EnvFilter;

async fn fetch_once(url: &str) -> Result<String, Failure<reqwest::Error>> {
    println!("Fetching {}", url);
    let resp = reqwest::get(url).await.map_err(Failure::transport)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Failure::http(status.as_u16()));
    }
    resp.text().await.map_err(Failure::transport)
}

async fn fetch_url(url: &str) -> Result<String, RetryError<reqwest::Error>> {
    let policy = ExponentialRetryPolicy::new(3, Duration::from_millis(200));
    retry(policy, || fetch_once(url)).await
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match fetch_url("https://www.rust-lang.org").await {
        Ok(_) => println!("Successfully fetched"),
        Err(err) => panic!("Failed to fetch: {}", err),
    }
}
