//! Delays used when no policy is configured.

use std::time::Duration;

/// Fixed staircase of delays used when no policy is configured.
///
/// Non-positive attempts fall into the first bucket, so callers may pass a raw
/// attempt number without clamping it first.
pub fn fallback_delay(attempt: i64) -> Duration {
    match attempt {
        i64::MIN..=0 => Duration::from_millis(500),
        1 => Duration::from_secs(2),
        2 => Duration::from_secs(5),
        3 => Duration::from_secs(10),
        _ => Duration::from_secs(30),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_attempts_use_first_bucket() {
        assert_eq!(fallback_delay(-1), Duration::from_millis(500));
        assert_eq!(fallback_delay(i64::MIN), Duration::from_millis(500));
    }

    #[test]
    fn staircase_tops_out_at_thirty_seconds() {
        assert_eq!(fallback_delay(4), Duration::from_secs(30));
        assert_eq!(fallback_delay(i64::MAX), Duration::from_secs(30));
    }
}
