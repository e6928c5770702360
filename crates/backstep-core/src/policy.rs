//! Retry delay policies.
//!
//! A [`DelayPolicy`] turns a count of consecutive failures into the delay a
//! caller should wait before the next attempt:
//!
//! ```text
//! attempt = max(0, fail_count - 1)
//! delay   = step * base ^ (pow_factor * attempt)   clamped to [min_delay, max_delay]
//! ```
//!
//! A zero `max_delay` disables the upper clamp. When no policy is configured,
//! `Option::<DelayPolicy>::None` goes through [`fallback_delay`] instead.
//!
//! ```rust
//! use std::time::Duration;
//! use backstep_core::{Backoff, DelayPolicy};
//!
//! let policy = DelayPolicy::new(Duration::from_secs(1), Duration::from_secs(10)).unwrap();
//! assert_eq!(policy.delay(1), Duration::from_secs(1));
//! assert_eq!(policy.delay(4), Duration::from_secs(10));
//!
//! let unset: Option<DelayPolicy> = None;
//! assert_eq!(unset.delay(2), Duration::from_secs(2));
//! ```

use std::time::Duration;

use tracing::{debug, trace, warn};

pub mod errors;
pub mod fallback;

pub use errors::DelayPolicyError;
pub use fallback::fallback_delay;

/// Step used by [`DelayPolicy::new`].
pub const DEFAULT_STEP: Duration = Duration::from_millis(500);
/// Exponent scale used by [`DelayPolicy::new`].
pub const DEFAULT_POW_FACTOR: f64 = 1.3;
/// Exponentiation base used by [`DelayPolicy::new`].
pub const DEFAULT_BASE: f64 = 3.0;

/// Anything that can answer "how long to wait after `fail_count` failures".
pub trait Backoff {
    /// Delay to wait before retrying after `fail_count` consecutive failures.
    fn delay(&self, fail_count: i64) -> Duration;
}

/// Zero-based retry index for a fail count. Non-positive counts map to 0.
pub fn attempt_for(fail_count: i64) -> i64 {
    if fail_count <= 0 { 0 } else { fail_count - 1 }
}

/// Bounded exponential delay policy.
///
/// Fields are public so a policy can be written as a literal; only
/// [`DelayPolicy::new`] and [`DelayPolicyBuilder::build`] validate the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayPolicy {
    /// Lower clamp bound.
    pub min_delay: Duration,
    /// Upper clamp bound, zero means unbounded.
    pub max_delay: Duration,
    /// Duration scaled by the exponential term.
    pub step: Duration,
    /// Exponentiation base.
    pub base: f64,
    /// Multiplier applied to the attempt before exponentiation.
    pub pow_factor: f64,
}

impl Default for DelayPolicy {
    /// Default curve (500ms step, base 3, factor 1.3) with no clamps.
    fn default() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            step: DEFAULT_STEP,
            base: DEFAULT_BASE,
            pow_factor: DEFAULT_POW_FACTOR,
        }
    }
}

impl DelayPolicy {
    /// Builds the default curve clamped to `[min_delay, max_delay]`.
    ///
    /// Fails when `max_delay` is non-zero and lower than `min_delay`.
    pub fn new(min_delay: Duration, max_delay: Duration) -> Result<Self, DelayPolicyError> {
        Self::builder()
            .min_delay(min_delay)
            .max_delay(max_delay)
            .build()
    }

    /// Starts from the default curve with no clamps.
    pub fn builder() -> DelayPolicyBuilder {
        DelayPolicyBuilder {
            policy: Self::default(),
        }
    }

    /// Computes the delay for `fail_count` consecutive failures.
    ///
    /// Total over all inputs. The float result is truncated to whole
    /// nanoseconds; negative or NaN values become zero and values past
    /// `u64::MAX` nanoseconds saturate.
    pub fn delay(&self, fail_count: i64) -> Duration {
        let attempt = attempt_for(fail_count);
        let raw = self.raw_delay(attempt);

        let delay = if raw < self.min_delay {
            self.min_delay
        } else if !self.max_delay.is_zero() && raw > self.max_delay {
            self.max_delay
        } else {
            raw
        };

        trace!(
            fail_count,
            attempt,
            raw_ns = raw.as_nanos() as u64,
            delay_ns = delay.as_nanos() as u64,
            clamped = delay != raw,
            "computed retry delay"
        );

        delay
    }

    fn raw_delay(&self, attempt: i64) -> Duration {
        let growth = self.base.powf(self.pow_factor * attempt as f64);
        let nanos = self.step.as_nanos() as f64 * growth;
        Duration::from_nanos(nanos as u64)
    }
}

impl Backoff for DelayPolicy {
    fn delay(&self, fail_count: i64) -> Duration {
        DelayPolicy::delay(self, fail_count)
    }
}

impl<B: Backoff> Backoff for Option<B> {
    /// Delegates to the configured policy, or to [`fallback_delay`] when unset.
    fn delay(&self, fail_count: i64) -> Duration {
        match self {
            Some(backoff) => backoff.delay(fail_count),
            None => fallback_delay(attempt_for(fail_count)),
        }
    }
}

impl<B: Backoff + ?Sized> Backoff for &B {
    fn delay(&self, fail_count: i64) -> Duration {
        (**self).delay(fail_count)
    }
}

/// Builder for [`DelayPolicy`].
#[derive(Debug, Clone, Copy)]
pub struct DelayPolicyBuilder {
    policy: DelayPolicy,
}

impl DelayPolicyBuilder {
    /// Lower clamp bound.
    pub fn min_delay(mut self, min_delay: Duration) -> Self {
        self.policy.min_delay = min_delay;
        self
    }

    /// Upper clamp bound, zero for none.
    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.policy.max_delay = max_delay;
        self
    }

    /// Duration scaled by the exponential term.
    pub fn step(mut self, step: Duration) -> Self {
        self.policy.step = step;
        self
    }

    /// Exponentiation base.
    pub fn base(mut self, base: f64) -> Self {
        self.policy.base = base;
        self
    }

    /// Exponent scale.
    pub fn pow_factor(mut self, pow_factor: f64) -> Self {
        self.policy.pow_factor = pow_factor;
        self
    }

    /// Validates the clamp bounds and returns the policy.
    pub fn build(self) -> Result<DelayPolicy, DelayPolicyError> {
        let DelayPolicy {
            min_delay,
            max_delay,
            ..
        } = self.policy;

        if !max_delay.is_zero() && max_delay < min_delay {
            warn!(
                min_delay_ms = min_delay.as_millis() as u64,
                max_delay_ms = max_delay.as_millis() as u64,
                "rejecting delay policy: max below min"
            );
            return Err(DelayPolicyError::Validation {
                min_delay,
                max_delay,
            });
        }

        debug!(
            min_delay_ms = min_delay.as_millis() as u64,
            max_delay_ms = max_delay.as_millis() as u64,
            step_ms = self.policy.step.as_millis() as u64,
            base = self.policy.base,
            pow_factor = self.policy.pow_factor,
            "delay policy built"
        );

        Ok(self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_is_floored_at_zero() {
        assert_eq!(attempt_for(i64::MIN), 0);
        assert_eq!(attempt_for(-1), 0);
        assert_eq!(attempt_for(0), 0);
        assert_eq!(attempt_for(1), 0);
        assert_eq!(attempt_for(2), 1);
        assert_eq!(attempt_for(i64::MAX), i64::MAX - 1);
    }

    #[test]
    fn raw_delay_truncates_to_nanoseconds() {
        let policy = DelayPolicy {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            step: Duration::from_nanos(10),
            base: 1.5,
            pow_factor: 1.0,
        };
        // 10 * 1.5 = 15, 10 * 2.25 = 22.5
        assert_eq!(policy.raw_delay(1), Duration::from_nanos(15));
        assert_eq!(policy.raw_delay(2), Duration::from_nanos(22));
    }

    #[test]
    fn overflowing_growth_saturates() {
        let policy = DelayPolicy::default();
        assert_eq!(policy.delay(i64::MAX), Duration::from_nanos(u64::MAX));
    }

    #[test]
    fn negative_base_does_not_panic() {
        let policy = DelayPolicy {
            base: -2.0,
            pow_factor: 0.5,
            ..DelayPolicy::default()
        };
        // (-2)^0.5 is NaN, which converts to zero
        assert_eq!(policy.delay(2), Duration::ZERO);
    }

    #[test]
    fn default_matches_unclamped_constructor() {
        assert_eq!(
            DelayPolicy::new(Duration::ZERO, Duration::ZERO).unwrap(),
            DelayPolicy::default()
        );
    }
}
