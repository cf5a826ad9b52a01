//! Engine configuration.
//!
//! The message limit and the three timing constants are behavioral
//! parameters, so they live in configuration rather than in code. The
//! defaults match the shipped product behavior.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_message_limit() -> u32 {
    4
}

fn default_tick_interval_ms() -> u64 {
    150
}

fn default_settle_delay_ms() -> u64 {
    300
}

fn default_registration_delay_ms() -> u64 {
    500
}

/// Behavioral parameters for a conversational session.
///
/// All fields have defaults, so a partial TOML document (or none at
/// all) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of user messages admitted before the session requires
    /// registration.
    #[serde(default = "default_message_limit")]
    pub message_limit: u32,
    /// Cadence of the token-reveal timer, in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Pause between the last revealed token and finalization, in
    /// milliseconds.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Delay before the registration gate opens after a blocked
    /// submission, in milliseconds. Exists so the quota notice is
    /// visibly rendered before the gate appears.
    #[serde(default = "default_registration_delay_ms")]
    pub registration_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            message_limit: default_message_limit(),
            tick_interval_ms: default_tick_interval_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            registration_delay_ms: default_registration_delay_ms(),
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the document is not valid TOML or
    /// contains fields of the wrong type.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Cadence of the token-reveal timer.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Pause between the last revealed token and finalization.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Delay before the registration gate opens after a blocked
    /// submission.
    pub fn registration_delay(&self) -> Duration {
        Duration::from_millis(self.registration_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_behavior() {
        let config = EngineConfig::default();
        assert_eq!(config.message_limit, 4);
        assert_eq!(config.tick_interval(), Duration::from_millis(150));
        assert_eq!(config.settle_delay(), Duration::from_millis(300));
        assert_eq!(config.registration_delay(), Duration::from_millis(500));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let config = EngineConfig::from_toml_str("message_limit = 10").unwrap();
        assert_eq!(config.message_limit, 10);
        assert_eq!(config.tick_interval_ms, 150);
        assert_eq!(config.settle_delay_ms, 300);
    }

    #[test]
    fn empty_toml_is_the_default_config() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = EngineConfig::from_toml_str("message_limit = \"four\"").unwrap_err();
        assert!(matches!(err, crate::ParleyError::Config(_)));
    }
}
