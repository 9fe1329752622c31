//! Scheduler timing configuration.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the standard 100 ms tick.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading a [`TickConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid tick configuration: {reason}")]
    Invalid { reason: String },
}

/// Timing knobs of the tick scheduler and offline catch-up. All values
/// are milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickConfig {
    /// Nominal time between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: i64,
    /// Ceiling on the delta fed to the simulation in one tick.
    #[serde(default = "default_max_delta_ms")]
    pub max_delta_ms: i64,
    /// A delta above this (or below zero) is treated as a wall-clock jump
    /// and replaced with the nominal interval.
    #[serde(default = "default_clock_change_threshold_ms")]
    pub clock_change_threshold_ms: i64,
    /// Simulated time between automatic saves.
    #[serde(default = "default_autosave_interval_ms")]
    pub autosave_interval_ms: i64,
    /// Longest absence credited as offline progress.
    #[serde(default = "default_max_offline_ms")]
    pub max_offline_ms: i64,
}

fn default_tick_interval_ms() -> i64 {
    100
}

fn default_max_delta_ms() -> i64 {
    1_000
}

fn default_clock_change_threshold_ms() -> i64 {
    60_000
}

fn default_autosave_interval_ms() -> i64 {
    10_000
}

fn default_max_offline_ms() -> i64 {
    8 * 60 * 60 * 1_000
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_delta_ms: default_max_delta_ms(),
            clock_change_threshold_ms: default_clock_change_threshold_ms(),
            autosave_interval_ms: default_autosave_interval_ms(),
            max_offline_ms: default_max_offline_ms(),
        }
    }
}

impl TickConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: TickConfig = if text.trim().is_empty() {
            TickConfig::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Checks that intervals are positive and consistently ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("tick_interval_ms", self.tick_interval_ms),
            ("max_delta_ms", self.max_delta_ms),
            ("clock_change_threshold_ms", self.clock_change_threshold_ms),
            ("autosave_interval_ms", self.autosave_interval_ms),
        ];
        for (name, value) in positive {
            if value <= 0 {
                return Err(ConfigError::Invalid {
                    reason: format!("{name} must be positive, got {value}"),
                });
            }
        }
        if self.max_offline_ms < 0 {
            return Err(ConfigError::Invalid {
                reason: "max_offline_ms must not be negative".to_owned(),
            });
        }
        if self.clock_change_threshold_ms < self.max_delta_ms {
            return Err(ConfigError::Invalid {
                reason: "clock_change_threshold_ms must be at least max_delta_ms".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        assert_eq!(TickConfig::from_yaml_str("").unwrap(), TickConfig::default());
        assert_eq!(TickConfig::from_yaml_str("{}").unwrap(), TickConfig::default());
    }

    #[test]
    fn partial_yaml_overrides_only_given_fields() {
        let c = TickConfig::from_yaml_str("tick_interval_ms: 50\nmax_offline_ms: 0\n").unwrap();
        assert_eq!(c.tick_interval_ms, 50);
        assert_eq!(c.max_offline_ms, 0);
        assert_eq!(c.max_delta_ms, 1_000);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            TickConfig::from_yaml_str("tick_interval_ms: 0"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            TickConfig::from_yaml_str("max_delta_ms: 90000"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            TickConfig::from_yaml_str("tick_interval_ms: [1, 2]"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
