//! Time helpers (always UTC).

use chrono::{DateTime, Duration, Utc};

/// A timestamp with timezone (always UTC for ratedesk).
pub type Timestamp = DateTime<Utc>;

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Check if a timestamp has expired (is in the past).
pub fn is_expired(expiry: Timestamp) -> bool {
    now() > expiry
}

/// Calculate expiry time from now.
pub fn expires_in(duration: Duration) -> Timestamp {
    now() + duration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_expired() {
        let past = now() - Duration::seconds(10);
        assert!(is_expired(past));

        let future = now() + Duration::seconds(10);
        assert!(!is_expired(future));
    }

    #[test]
    fn test_expires_in_negative_duration_is_already_expired() {
        let expiry = expires_in(Duration::seconds(-1));
        assert!(is_expired(expiry));
    }
}
