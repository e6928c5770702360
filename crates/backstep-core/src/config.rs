//! Loading a [`DelayPolicy`] from the environment or a serialized document.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::{DEFAULT_BASE, DEFAULT_POW_FACTOR, DEFAULT_STEP, DelayPolicy, DelayPolicyError};

const MIN_DELAY_MS_ENV: &str = "BACKSTEP_MIN_DELAY_MS";
const MAX_DELAY_MS_ENV: &str = "BACKSTEP_MAX_DELAY_MS";
const STEP_MS_ENV: &str = "BACKSTEP_STEP_MS";
const BASE_ENV: &str = "BACKSTEP_BASE";
const POW_FACTOR_ENV: &str = "BACKSTEP_POW_FACTOR";

/// Errors raised while turning configuration into a policy.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value as read.
        value: String,
    },

    /// The parsed bounds were rejected by the policy.
    #[error(transparent)]
    Policy(#[from] DelayPolicyError),
}

/// Serializable description of a [`DelayPolicy`], in milliseconds.
///
/// Missing fields fall back to the default curve with no clamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayPolicyConfig {
    /// Lower clamp bound.
    pub min_delay_ms: u64,
    /// Upper clamp bound, zero for none.
    pub max_delay_ms: u64,
    /// Step of the exponential curve.
    pub step_ms: u64,
    /// Exponentiation base.
    pub base: f64,
    /// Exponent scale.
    pub pow_factor: f64,
}

impl Default for DelayPolicyConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
            step_ms: DEFAULT_STEP.as_millis() as u64,
            base: DEFAULT_BASE,
            pow_factor: DEFAULT_POW_FACTOR,
        }
    }
}

impl DelayPolicyConfig {
    /// Reads `BACKSTEP_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    ///
    /// Unset and blank values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.min_delay_ms = parse_var(&lookup, MIN_DELAY_MS_ENV, config.min_delay_ms)?;
        config.max_delay_ms = parse_var(&lookup, MAX_DELAY_MS_ENV, config.max_delay_ms)?;
        config.step_ms = parse_var(&lookup, STEP_MS_ENV, config.step_ms)?;
        config.base = parse_var(&lookup, BASE_ENV, config.base)?;
        config.pow_factor = parse_var(&lookup, POW_FACTOR_ENV, config.pow_factor)?;
        Ok(config)
    }

    /// Builds and validates the policy.
    pub fn into_policy(self) -> Result<DelayPolicy, ConfigError> {
        let policy = DelayPolicy::builder()
            .min_delay(Duration::from_millis(self.min_delay_ms))
            .max_delay(Duration::from_millis(self.max_delay_ms))
            .step(Duration::from_millis(self.step_ms))
            .base(self.base)
            .pow_factor(self.pow_factor)
            .build()?;
        Ok(policy)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value: raw })
}
