//! Cache Configuration
//!
//! Capacity, promotion and decay parameters for the tiered cache.

use serde::{Deserialize, Serialize};

/// Tier capacities and transition thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries in the recent ring (default: 50)
    pub max_recent: usize,

    /// Maximum number of entries in the hot set (default: 20)
    pub max_hot: usize,

    /// Usage count at which a recent entry is promoted to hot (default: 3)
    pub promote_threshold: u32,

    /// Days without use before an entry counts as stale (default: 14)
    pub decay_days: u32,

    /// Minimum hours between gated rotation passes (default: 24)
    pub rotation_interval_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_recent: 50,
            max_hot: 20,
            promote_threshold: 3,
            decay_days: 14,
            rotation_interval_hours: 24,
        }
    }
}

impl CacheConfig {
    /// Set the recent capacity
    pub fn with_max_recent(mut self, max_recent: usize) -> Self {
        self.max_recent = max_recent;
        self
    }

    /// Set the hot capacity
    pub fn with_max_hot(mut self, max_hot: usize) -> Self {
        self.max_hot = max_hot;
        self
    }

    /// Set the promotion threshold
    pub fn with_promote_threshold(mut self, promote_threshold: u32) -> Self {
        self.promote_threshold = promote_threshold;
        self
    }

    /// Set the decay window
    pub fn with_decay_days(mut self, decay_days: u32) -> Self {
        self.decay_days = decay_days;
        self
    }

    /// Set the rotation gate interval
    pub fn with_rotation_interval_hours(mut self, hours: u64) -> Self {
        self.rotation_interval_hours = hours;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_recent == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "max_recent".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.max_hot == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "max_hot".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.promote_threshold == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "promote_threshold".into(),
                message: "must be greater than 0".into(),
            });
        }

        if self.decay_days == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "decay_days".into(),
                message: "must be greater than 0".into(),
            });
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.max_recent, 50);
        assert_eq!(config.max_hot, 20);
        assert_eq!(config.promote_threshold, 3);
        assert_eq!(config.decay_days, 14);
        assert_eq!(config.rotation_interval_hours, 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = CacheConfig::default()
            .with_max_recent(3)
            .with_max_hot(2)
            .with_promote_threshold(2)
            .with_decay_days(7);

        assert_eq!(config.max_recent, 3);
        assert_eq!(config.max_hot, 2);
        assert_eq!(config.promote_threshold, 2);
        assert_eq!(config.decay_days, 7);
    }

    #[test]
    fn test_config_validation() {
        assert!(CacheConfig::default().with_max_recent(0).validate().is_err());
        assert!(CacheConfig::default().with_max_hot(0).validate().is_err());
        assert!(CacheConfig::default().with_promote_threshold(0).validate().is_err());

        let err = CacheConfig::default().with_decay_days(0).validate().unwrap_err();
        assert!(err.to_string().contains("decay_days"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CacheConfig = serde_json::from_str(r#"{"max_hot": 5}"#).unwrap();
        assert_eq!(config.max_hot, 5);
        assert_eq!(config.max_recent, 50);
    }
}
