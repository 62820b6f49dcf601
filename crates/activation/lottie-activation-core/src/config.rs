//! Controller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ActivationError;

/// Selector matching every animation marker.
pub const DEFAULT_SELECTOR: &str = "[data-lottie-src]";

/// `preserveAspectRatio` value handed to the renderer: keep the aspect ratio,
/// center, and crop to fill the container.
pub const DEFAULT_ASPECT_FIT: &str = "xMidYMid slice";

/// Backoff used while the animation runtime has not loaded yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub initial_delay_ms: u32,
    /// Multiplier applied to the delay after every failed attempt.
    pub backoff_factor: f64,
    /// Upper bound for a single delay.
    pub max_delay_ms: u32,
    /// Failed availability checks tolerated before giving up.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 50,
            backoff_factor: 2.0,
            max_delay_ms: 2_000,
            max_attempts: 40,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the `attempt`-th failed check (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let raw = f64::from(self.initial_delay_ms) * self.backoff_factor.powi(exp);
        let capped = raw.min(f64::from(self.max_delay_ms));
        Duration::from_millis(capped.max(0.0) as u64)
    }

    /// True once `attempts` failed checks exhaust the policy.
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        attempts >= self.max_attempts
    }
}

/// Configuration for a [`Controller`](crate::Controller).
/// Every field has a default, so hosts may pass a partial object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub selector: String,
    /// Pre-trigger margin around the viewport, in CSS pixels.
    pub root_margin_px: u32,
    pub aspect_fit: String,
    pub progressive_load: bool,
    pub retry: RetryPolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            selector: DEFAULT_SELECTOR.to_string(),
            root_margin_px: 50,
            aspect_fit: DEFAULT_ASPECT_FIT.to_string(),
            progressive_load: true,
            retry: RetryPolicy::default(),
        }
    }
}

impl ControllerConfig {
    /// Root margin in the CSS form `IntersectionObserver` expects.
    pub fn root_margin(&self) -> String {
        format!("{}px", self.root_margin_px)
    }

    pub fn validate(&self) -> Result<(), ActivationError> {
        if self.selector.trim().is_empty() {
            return Err(ActivationError::InvalidConfig(
                "selector must not be empty".into(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ActivationError::InvalidConfig(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if !self.retry.backoff_factor.is_finite() || self.retry.backoff_factor < 1.0 {
            return Err(ActivationError::InvalidConfig(format!(
                "retry.backoff_factor must be a finite value >= 1.0, got {}",
                self.retry.backoff_factor
            )));
        }
        if self.retry.max_delay_ms < self.retry.initial_delay_ms {
            return Err(ActivationError::InvalidConfig(
                "retry.max_delay_ms must not be below retry.initial_delay_ms".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(50));
        assert_eq!(policy.delay_for(2), Duration::from_millis(100));
        assert_eq!(policy.delay_for(3), Duration::from_millis(200));
        assert_eq!(policy.delay_for(10), Duration::from_millis(2_000));
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_millis(2_000));
    }

    #[test]
    fn flat_policy_keeps_fixed_interval() {
        let policy = RetryPolicy {
            backoff_factor: 1.0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(50));
        assert_eq!(policy.delay_for(25), Duration::from_millis(50));
    }

    #[test]
    fn validate_rejects_bad_retry_settings() {
        let mut cfg = ControllerConfig::default();
        assert!(cfg.validate().is_ok());

        cfg.retry.max_attempts = 0;
        assert!(matches!(
            cfg.validate(),
            Err(ActivationError::InvalidConfig(_))
        ));

        cfg.retry.max_attempts = 3;
        cfg.retry.backoff_factor = 0.5;
        assert!(cfg.validate().is_err());

        cfg.retry.backoff_factor = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn root_margin_renders_css_pixels() {
        assert_eq!(ControllerConfig::default().root_margin(), "50px");
    }
}
