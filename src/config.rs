//! Gate configuration.

use serde::{Deserialize, Serialize};

/// Tuning knobs for detection and pre-load behavior.
///
/// All fields have defaults matching the values the gate ships with, so a
/// partially-specified serialized config deserializes cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Delay between poll attempts.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Overall detection budget; polling stops once this is exhausted.
    #[serde(default = "default_max_wait_time_ms")]
    pub max_wait_time_ms: u64,
    /// Pre-load mode: delay before the one-shot unknown-version check.
    #[serde(default = "default_unknown_watchdog_ms")]
    pub unknown_watchdog_ms: u64,
    /// When true, log the detected handle's structural self-description.
    #[serde(default)]
    pub debug: bool,
    /// Exact version literal required for the legacy protocol; `None`
    /// accepts any handle exposing the legacy hub markers.
    #[serde(default)]
    pub expected_version: Option<String>,
    /// Storage key holding the user's saved renderer preference.
    #[serde(default = "default_settings_key")]
    pub settings_key: String,
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_max_wait_time_ms() -> u64 {
    10_000
}

fn default_unknown_watchdog_ms() -> u64 {
    2_000
}

fn default_settings_key() -> String {
    "MathJax-Menu-Settings".to_string()
}

impl Default for GateConfig {
    fn default() -> Self {
        GateConfig {
            poll_interval_ms: default_poll_interval_ms(),
            max_wait_time_ms: default_max_wait_time_ms(),
            unknown_watchdog_ms: default_unknown_watchdog_ms(),
            debug: false,
            expected_version: None,
            settings_key: default_settings_key(),
        }
    }
}
