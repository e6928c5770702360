//! # backstep
//!
//! Retry delay calculation. Given how many times an operation has failed in a
//! row, a [`DelayPolicy`] says how long to wait before trying again. Waiting,
//! retrying and cancellation stay with the caller.
//!
//! ```rust
//! use std::time::Duration;
//! use backstep_core::{Backoff, DelayPolicy, fallback_delay};
//!
//! let policy = DelayPolicy::new(Duration::ZERO, Duration::from_secs(30)).unwrap();
//! assert_eq!(policy.delay(0), Duration::from_millis(500));
//!
//! let unset: Option<DelayPolicy> = None;
//! assert_eq!(unset.delay(5), fallback_delay(4));
//! ```

pub mod config;
pub mod policy;

pub use config::{ConfigError, DelayPolicyConfig};
pub use policy::{
    Backoff, DEFAULT_BASE, DEFAULT_POW_FACTOR, DEFAULT_STEP, DelayPolicy, DelayPolicyBuilder,
    DelayPolicyError, attempt_for, fallback_delay,
};
