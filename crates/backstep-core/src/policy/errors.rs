//! Policy construction errors.

use std::time::Duration;

/// Errors raised while constructing a [`DelayPolicy`](crate::DelayPolicy).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DelayPolicyError {
    /// A positive `max_delay` was set below `min_delay`.
    #[error("max delay {max_delay:?} is lower than min delay {min_delay:?}")]
    Validation {
        /// Requested lower bound.
        min_delay: Duration,
        /// Requested upper bound.
        max_delay: Duration,
    },
}
