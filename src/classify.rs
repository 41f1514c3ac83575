//! Classify HTTP status codes and transport errors into retryable and fatal failures.

use std::error::Error as StdError;

/// Retry-relevant category of one failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// 5xx other than 501 and 505: the server is overloaded or briefly unavailable.
    TransientServer(u16),
    /// 401, 408 or 429: the request may succeed later without any change.
    TransientClient(u16),
    /// No response was received but the attempt failed (connection reset, DNS, client timeout).
    Transport,
    /// Anything else. `None` when there was neither a usable status code nor an error.
    Permanent(Option<u16>),
}

impl FailureClass {
    pub fn is_retryable(self) -> bool {
        !matches!(self, FailureClass::Permanent(_))
    }
}

/// Classify the outcome of a failed attempt.
///
/// Status codes outside `100..=599` carry no meaning for the decision and are
/// handled as if the request never got a response.
pub fn classify(status: Option<u16>, error: Option<&(dyn StdError + 'static)>) -> FailureClass {
    match status {
        Some(code @ (401 | 408 | 429)) => FailureClass::TransientClient(code),
        // Not Implemented and HTTP Version Not Supported will not change on their own.
        Some(code @ (501 | 505)) => FailureClass::Permanent(Some(code)),
        Some(code @ 100..=499) => FailureClass::Permanent(Some(code)),
        Some(code @ 500..=599) => FailureClass::TransientServer(code),
        Some(code) if error.is_none() => FailureClass::Permanent(Some(code)),
        _ if error.is_some() => FailureClass::Transport,
        _ => FailureClass::Permanent(None),
    }
}

/// Shorthand for `classify(status, error).is_retryable()`.
pub fn is_retryable(status: Option<u16>, error: Option<&(dyn StdError + 'static)>) -> bool {
    classify(status, error).is_retryable()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn reset() -> io::Error {
        io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer")
    }

    #[test]
    fn every_5xx_but_501_and_505_is_transient() {
        for code in 500..=599u16 {
            let class = classify(Some(code), None);
            match code {
                501 | 505 => assert_eq!(class, FailureClass::Permanent(Some(code))),
                _ => assert_eq!(class, FailureClass::TransientServer(code)),
            }
        }
    }

    #[test]
    fn listed_4xx_are_transient() {
        for code in [401u16, 408, 429].iter().copied() {
            assert_eq!(classify(Some(code), None), FailureClass::TransientClient(code));
        }
    }

    #[test]
    fn other_statuses_are_permanent() {
        for code in [200u16, 201, 204, 301, 304, 400, 403, 404, 409, 412, 416].iter().copied() {
            assert!(!is_retryable(Some(code), None), "{} should not be retried", code);
        }
    }

    #[test]
    fn status_wins_over_error() {
        let err = reset();
        assert_eq!(
            classify(Some(404), Some(&err)),
            FailureClass::Permanent(Some(404))
        );
        assert_eq!(
            classify(Some(503), Some(&err)),
            FailureClass::TransientServer(503)
        );
    }

    #[test]
    fn missing_response_with_error_is_transport() {
        let err = reset();
        assert_eq!(classify(None, Some(&err)), FailureClass::Transport);
        assert_eq!(classify(Some(0), Some(&err)), FailureClass::Transport);
        assert_eq!(classify(Some(600), Some(&err)), FailureClass::Transport);
    }

    #[test]
    fn nothing_observed_is_permanent() {
        assert_eq!(classify(None, None), FailureClass::Permanent(None));
        assert_eq!(classify(Some(600), None), FailureClass::Permanent(Some(600)));
    }
}
