use std::time::Duration;

use crate::{Error, Result};

const DEFAULT_URL: &str = "ws://127.0.0.1:5000";
const DEFAULT_PROTOCOL: &str = "webhuesli-protocol";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub url: String,
    pub protocol: Option<String>,
    pub alarm_armed: bool,
    pub debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            protocol: Some(DEFAULT_PROTOCOL.to_string()),
            alarm_armed: false,
            debounce: Duration::ZERO,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("WEBHOUSE_URL") {
            if !url.starts_with("ws://") && !url.starts_with("wss://") {
                return Err(Error::Config(format!(
                    "WEBHOUSE_URL must be a ws:// or wss:// url, got {url}"
                )));
            }
            config.url = url;
        }

        if let Some(protocol) = lookup("WEBHOUSE_PROTOCOL") {
            config.protocol = Some(protocol).filter(|protocol| !protocol.is_empty());
        }

        if let Some(armed) = lookup("WEBHOUSE_ALARM_ARMED") {
            config.alarm_armed = parse_flag(&armed).ok_or_else(|| {
                Error::Config(format!("WEBHOUSE_ALARM_ARMED is not a flag: {armed}"))
            })?;
        }

        if let Some(millis) = lookup("WEBHOUSE_DEBOUNCE_MS") {
            let millis = millis.trim().parse::<u64>().map_err(|err| {
                Error::Config(format!("WEBHOUSE_DEBOUNCE_MS {millis}: {err}"))
            })?;
            config.debounce = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();

        assert_eq!(config.url, "ws://127.0.0.1:5000");
        assert_eq!(config.protocol.as_deref(), Some("webhuesli-protocol"));
        assert!(!config.alarm_armed);
        assert_eq!(config.debounce, Duration::ZERO);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("WEBHOUSE_URL", "ws://192.168.7.2:5000"),
            ("WEBHOUSE_PROTOCOL", ""),
            ("WEBHOUSE_ALARM_ARMED", "yes"),
            ("WEBHOUSE_DEBOUNCE_MS", "150"),
        ])
        .unwrap();

        assert_eq!(config.url, "ws://192.168.7.2:5000");
        assert_eq!(config.protocol, None);
        assert!(config.alarm_armed);
        assert_eq!(config.debounce, Duration::from_millis(150));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config(&[("WEBHOUSE_URL", "http://example.com")]),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            config(&[("WEBHOUSE_ALARM_ARMED", "maybe")]),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            config(&[("WEBHOUSE_DEBOUNCE_MS", "-1")]),
            Err(Error::Config(_))
        ));
    }
}
