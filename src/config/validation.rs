//! Scenario validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject options that do not apply to the chosen wrapper
//! - Keep replays bounded
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ScenarioConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::{ScenarioConfig, WrapperKind};

/// Longest wait a scenario may configure.
pub const MAX_WAIT_MS: u64 = 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("scenario has no calls")]
    NoCalls,

    #[error("call #{index} has an empty label")]
    EmptyLabel { index: usize },

    #[error("wait_ms {wait_ms} exceeds the maximum of {max}")]
    WaitTooLong { wait_ms: u64, max: u64 },

    #[error("option `{option}` does not apply to a {kind} wrapper")]
    InapplicableOption {
        option: &'static str,
        kind: WrapperKind,
    },

    #[error("throttle with both leading and trailing disabled never runs within a window")]
    NoEdges,
}

pub fn validate_config(config: &ScenarioConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let wrapper = &config.wrapper;

    if config.calls.is_empty() {
        errors.push(ValidationError::NoCalls);
    }

    for (index, call) in config.calls.iter().enumerate() {
        if call.label.trim().is_empty() {
            errors.push(ValidationError::EmptyLabel { index });
        }
    }

    if wrapper.wait_ms > MAX_WAIT_MS {
        errors.push(ValidationError::WaitTooLong {
            wait_ms: wrapper.wait_ms,
            max: MAX_WAIT_MS,
        });
    }

    match wrapper.kind {
        WrapperKind::Debounce => {
            let throttle_only = [
                ("leading", wrapper.leading.is_some()),
                ("trailing", wrapper.trailing.is_some()),
            ];
            for (option, set) in throttle_only {
                if set {
                    errors.push(ValidationError::InapplicableOption {
                        option,
                        kind: wrapper.kind,
                    });
                }
            }
        }
        WrapperKind::Throttle => {
            if wrapper.immediate.is_some() {
                errors.push(ValidationError::InapplicableOption {
                    option: "immediate",
                    kind: wrapper.kind,
                });
            }
            let options = wrapper.throttle_options();
            if !options.leading && !options.trailing {
                errors.push(ValidationError::NoEdges);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::CallConfig;

    fn scenario(kind: WrapperKind) -> ScenarioConfig {
        let mut config = ScenarioConfig::default();
        config.wrapper.kind = kind;
        config.calls.push(CallConfig {
            at_ms: 0,
            label: "resize".into(),
        });
        config
    }

    #[test]
    fn test_valid_scenarios_pass() {
        assert!(validate_config(&scenario(WrapperKind::Debounce)).is_ok());
        assert!(validate_config(&scenario(WrapperKind::Throttle)).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = scenario(WrapperKind::Throttle);
        config.calls.push(CallConfig {
            at_ms: 10,
            label: "  ".into(),
        });
        config.wrapper.wait_ms = MAX_WAIT_MS + 1;
        config.wrapper.immediate = Some(true);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyLabel { index: 1 },
                ValidationError::WaitTooLong {
                    wait_ms: MAX_WAIT_MS + 1,
                    max: MAX_WAIT_MS
                },
                ValidationError::InapplicableOption {
                    option: "immediate",
                    kind: WrapperKind::Throttle
                },
            ]
        );
    }

    #[test]
    fn test_empty_trace_rejected() {
        let mut config = scenario(WrapperKind::Debounce);
        config.calls.clear();
        assert_eq!(validate_config(&config), Err(vec![ValidationError::NoCalls]));
    }

    #[test]
    fn test_throttle_options_on_debounce_rejected() {
        let mut config = scenario(WrapperKind::Debounce);
        config.wrapper.trailing = Some(false);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InapplicableOption {
                option: "trailing",
                kind: WrapperKind::Debounce
            }]
        );
    }

    #[test]
    fn test_throttle_without_edges_rejected() {
        let mut config = scenario(WrapperKind::Throttle);
        config.wrapper.leading = Some(false);
        config.wrapper.trailing = Some(false);
        assert_eq!(validate_config(&config), Err(vec![ValidationError::NoEdges]));
    }
}
