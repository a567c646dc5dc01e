//! Scenario schema definitions.
//!
//! A scenario describes one wrapper and a trace of calls to replay through
//! it. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::rate::ThrottleOptions;

/// Root of a scenario file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Wrapper under test.
    pub wrapper: WrapperConfig,

    /// Calls to replay, in any order; they are sorted by offset.
    pub calls: Vec<CallConfig>,
}

/// Which wrapper to build and how.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WrapperConfig {
    pub kind: WrapperKind,

    /// Quiet period (debounce) or window length (throttle).
    pub wait_ms: u64,

    /// Debounce only: run on the first call of a burst.
    pub immediate: Option<bool>,

    /// Throttle only: run on the first call of a window (default: true).
    pub leading: Option<bool>,

    /// Throttle only: run at the end of a window (default: true).
    pub trailing: Option<bool>,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            kind: WrapperKind::Debounce,
            wait_ms: 100,
            immediate: None,
            leading: None,
            trailing: None,
        }
    }
}

impl WrapperConfig {
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }

    pub fn immediate(&self) -> bool {
        self.immediate.unwrap_or(false)
    }

    pub fn throttle_options(&self) -> ThrottleOptions {
        let defaults = ThrottleOptions::default();
        ThrottleOptions {
            leading: self.leading.unwrap_or(defaults.leading),
            trailing: self.trailing.unwrap_or(defaults.trailing),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WrapperKind {
    Debounce,
    Throttle,
}

impl WrapperKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WrapperKind::Debounce => "debounce",
            WrapperKind::Throttle => "throttle",
        }
    }
}

impl std::fmt::Display for WrapperKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One call in the trace.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallConfig {
    /// Offset from the start of the replay.
    pub at_ms: u64,

    /// Passed to the callback, and reported when the callback runs.
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_throttle_scenario() {
        let raw = r#"
            [wrapper]
            kind = "throttle"
            wait_ms = 250
            leading = false

            [[calls]]
            at_ms = 0
            label = "scroll"

            [[calls]]
            at_ms = 40
            label = "scroll-again"
        "#;

        let config: ScenarioConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.wrapper.kind, WrapperKind::Throttle);
        assert_eq!(config.wrapper.wait(), Duration::from_millis(250));
        assert_eq!(
            config.wrapper.throttle_options(),
            ThrottleOptions {
                leading: false,
                trailing: true
            }
        );
        assert_eq!(config.calls.len(), 2);
        assert_eq!(config.calls[1].label, "scroll-again");
    }

    #[test]
    fn test_wrapper_defaults() {
        let config: ScenarioConfig = toml::from_str("").unwrap();
        assert_eq!(config.wrapper.kind, WrapperKind::Debounce);
        assert_eq!(config.wrapper.wait_ms, 100);
        assert!(!config.wrapper.immediate());
        assert!(config.calls.is_empty());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let raw = "[wrapper]\nkind = \"sample\"\n";
        assert!(toml::from_str::<ScenarioConfig>(raw).is_err());
    }
}
