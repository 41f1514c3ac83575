//! Defaults shared by the retry policies.

/// The baseline wait before the first retry in milliseconds (1 second).
pub const RETRY_INTERVAL_MILLIS: u64 = 1_000;
/// The default number of retries granted to one logical operation.
pub const MAX_RETRIES: u32 = 4;
/// The factor the wait grows by after every retry.
pub const EXPONENTIAL_FACTOR: u32 = 4;
