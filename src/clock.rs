use std::thread;
use std::time::Duration;

/// Clock blocks the calling thread between attempts.
///
/// Policies wait through their clock so the backoff schedule can be observed
/// without sleeping.
pub trait Clock {
    fn sleep(&self, dur: Duration);
}

/// `SystemClock` really sleeps.
/// This Clock should be used for real use-cases.
#[derive(Debug, Default, Clone)]
pub struct SystemClock {}

impl Clock for SystemClock {
    fn sleep(&self, dur: Duration) {
        thread::sleep(dur)
    }
}

