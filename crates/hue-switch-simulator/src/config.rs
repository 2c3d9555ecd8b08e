//! Simulator configuration from environment variables
//!
//! A `.env` file in the working directory is loaded first, so overrides can
//! live next to the binary instead of the shell profile.
//!
//! | Variable              | Default | Meaning                                  |
//! |-----------------------|---------|------------------------------------------|
//! | `HUE_SOURCE_ENDPOINT` | 1       | Endpoint stamped on outgoing commands    |
//! | `HUE_TARGET_ENDPOINT` | 11      | Bulb endpoint receiving the toggle       |
//! | `HUE_CENTRALIZED`     | true    | Form as a centralized trust center       |
//! | `HUE_JOIN_POLICY`     | any     | `any` or `ignore-departures`             |
//! | `HUE_TICK_MS`         | 100     | Scheduler tick period                    |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use hue_switch_core::{ControllerConfig, JoinPolicy};
use thiserror_no_std::Error;

const DEFAULT_TICK_MS: u64 = 100;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

pub struct SimulatorConfig {
    pub controller: ControllerConfig,
    pub tick: Duration,
}

impl SimulatorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {}", e);
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from `lookup`, which maps a variable name to its value
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ControllerConfig::default();
        let controller = ControllerConfig {
            source_endpoint: parse_var(&lookup, "HUE_SOURCE_ENDPOINT")?
                .unwrap_or(defaults.source_endpoint),
            target_endpoint: parse_var(&lookup, "HUE_TARGET_ENDPOINT")?
                .unwrap_or(defaults.target_endpoint),
            centralized: parse_var(&lookup, "HUE_CENTRALIZED")?.unwrap_or(defaults.centralized),
            join_policy: match lookup("HUE_JOIN_POLICY") {
                None => defaults.join_policy,
                Some(value) => parse_join_policy(&value)?,
            },
        };
        let tick_ms = parse_var(&lookup, "HUE_TICK_MS")?.unwrap_or(DEFAULT_TICK_MS);

        Ok(Self {
            controller,
            tick: Duration::from_millis(tick_ms),
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(None),
    }
}

fn parse_join_policy(value: &str) -> Result<JoinPolicy, ConfigError> {
    match value.trim() {
        "any" => Ok(JoinPolicy::AnyUpdate),
        "ignore-departures" => Ok(JoinPolicy::IgnoreDepartures),
        _ => Err(ConfigError::Invalid {
            name: "HUE_JOIN_POLICY",
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<SimulatorConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SimulatorConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = load(&[]).unwrap();

        assert_eq!(config.controller, ControllerConfig::default());
        assert_eq!(config.tick, Duration::from_millis(DEFAULT_TICK_MS));
    }

    #[test]
    fn test_variables_override_defaults() {
        let config = load(&[
            ("HUE_SOURCE_ENDPOINT", "2"),
            ("HUE_TARGET_ENDPOINT", " 3 "),
            ("HUE_CENTRALIZED", "false"),
            ("HUE_JOIN_POLICY", "ignore-departures"),
            ("HUE_TICK_MS", "250"),
        ])
        .unwrap();

        assert_eq!(config.controller.source_endpoint, 2);
        assert_eq!(config.controller.target_endpoint, 3);
        assert!(!config.controller.centralized);
        assert_eq!(config.controller.join_policy, JoinPolicy::IgnoreDepartures);
        assert_eq!(config.tick, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_tick_is_rejected() {
        match load(&[("HUE_TICK_MS", "abc")]) {
            Err(ConfigError::Invalid { name, value }) => {
                assert_eq!(name, "HUE_TICK_MS");
                assert_eq!(value, "abc");
            }
            Ok(_) => panic!("expected HUE_TICK_MS=abc to be rejected"),
        }
    }

    #[test]
    fn test_out_of_range_endpoint_is_rejected() {
        assert!(matches!(
            load(&[("HUE_TARGET_ENDPOINT", "300")]),
            Err(ConfigError::Invalid {
                name: "HUE_TARGET_ENDPOINT",
                ..
            })
        ));
    }

    #[test]
    fn test_parse_join_policy() {
        assert_eq!(parse_join_policy("any").unwrap(), JoinPolicy::AnyUpdate);
        assert_eq!(
            parse_join_policy(" ignore-departures ").unwrap(),
            JoinPolicy::IgnoreDepartures
        );
        assert!(parse_join_policy("first").is_err());
    }
}
