//! Bridge settings loaded from the process environment.
//!
//! # Design
//! - Every setting has a default; unset or blank variables keep it.
//! - Malformed values are rejected rather than silently defaulted.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use luna_config::{CONFIGURE_URL, JsonFileStore, KeyValueStore, MemoryStore};
use luna_events::DEFAULT_REPLAY_CAPACITY;
use luna_location::FixOptions;
use tracing::debug;

use crate::error::{BridgeError, BridgeResult};

/// URL of the settings form.
pub const ENV_CONFIGURE_URL: &str = "LUNA_CONFIGURE_URL";
/// Fix timeout in milliseconds.
pub const ENV_FIX_TIMEOUT_MS: &str = "LUNA_FIX_TIMEOUT_MS";
/// Maximum cached fix age in milliseconds.
pub const ENV_FIX_MAX_AGE_MS: &str = "LUNA_FIX_MAX_AGE_MS";
/// High-accuracy flag.
pub const ENV_FIX_HIGH_ACCURACY: &str = "LUNA_FIX_HIGH_ACCURACY";
/// Path of the JSON key-value store.
pub const ENV_STORE_PATH: &str = "LUNA_STORE_PATH";

/// Runtime settings for one bridge instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// URL opened when the user asks for the settings form.
    pub configure_url: String,
    /// Options attached to every fix request.
    pub fix_options: FixOptions,
    /// JSON store location; `None` keeps configuration in memory.
    pub store_path: Option<PathBuf>,
    /// Recent diagnostic events kept on the bus.
    pub event_replay_capacity: usize,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            configure_url: CONFIGURE_URL.to_string(),
            fix_options: FixOptions::default(),
            store_path: None,
            event_replay_capacity: DEFAULT_REPLAY_CAPACITY,
        }
    }
}

impl BridgeSettings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidSetting`] when a variable is present but
    /// malformed.
    pub fn from_env() -> BridgeResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidSetting`] when a value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BridgeResult<Self> {
        let value = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut settings = Self::default();

        if let Some(url) = value(ENV_CONFIGURE_URL) {
            settings.configure_url = parse_url(&url)?;
        }
        if let Some(raw) = value(ENV_FIX_TIMEOUT_MS) {
            let timeout = parse_millis(ENV_FIX_TIMEOUT_MS, &raw)?;
            if timeout.is_zero() {
                return Err(BridgeError::invalid_setting(
                    ENV_FIX_TIMEOUT_MS,
                    raw,
                    "must_be_positive",
                ));
            }
            settings.fix_options.timeout = timeout;
        }
        if let Some(raw) = value(ENV_FIX_MAX_AGE_MS) {
            settings.fix_options.maximum_age = parse_millis(ENV_FIX_MAX_AGE_MS, &raw)?;
        }
        if let Some(raw) = value(ENV_FIX_HIGH_ACCURACY) {
            settings.fix_options.enable_high_accuracy = parse_flag(ENV_FIX_HIGH_ACCURACY, &raw)?;
        }
        if let Some(path) = value(ENV_STORE_PATH) {
            settings.store_path = Some(PathBuf::from(path.trim()));
        }

        debug!(?settings, "resolved bridge settings");
        Ok(settings)
    }

    /// Open the configured key-value medium.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON store exists but cannot be read.
    pub fn open_store(&self) -> BridgeResult<Arc<dyn KeyValueStore>> {
        match &self.store_path {
            Some(path) => {
                let store = JsonFileStore::open(path)
                    .map_err(|source| BridgeError::config("settings.open_store", source))?;
                Ok(Arc::new(store))
            }
            None => Ok(Arc::new(MemoryStore::new())),
        }
    }
}

fn parse_url(raw: &str) -> BridgeResult<String> {
    let url = raw.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(BridgeError::invalid_setting(
            ENV_CONFIGURE_URL,
            raw,
            "expected_http_url",
        ))
    }
}

fn parse_millis(name: &'static str, raw: &str) -> BridgeResult<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| BridgeError::invalid_setting(name, raw, "expected_millis"))
}

fn parse_flag(name: &'static str, raw: &str) -> BridgeResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(BridgeError::invalid_setting(name, raw, "expected_flag")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() -> BridgeResult<()> {
        let settings = BridgeSettings::from_lookup(lookup(&[]))?;
        assert_eq!(settings, BridgeSettings::default());
        assert_eq!(settings.configure_url, CONFIGURE_URL);
        assert_eq!(settings.fix_options.timeout, Duration::from_secs(60));
        Ok(())
    }

    #[test]
    fn variables_override_defaults() -> BridgeResult<()> {
        let settings = BridgeSettings::from_lookup(lookup(&[
            (ENV_CONFIGURE_URL, "https://luna.example/config"),
            (ENV_FIX_TIMEOUT_MS, "1500"),
            (ENV_FIX_MAX_AGE_MS, "250"),
            (ENV_FIX_HIGH_ACCURACY, "Yes"),
            (ENV_STORE_PATH, " /tmp/luna.json "),
        ]))?;
        assert_eq!(settings.configure_url, "https://luna.example/config");
        assert_eq!(settings.fix_options.timeout, Duration::from_millis(1500));
        assert_eq!(settings.fix_options.maximum_age, Duration::from_millis(250));
        assert!(settings.fix_options.enable_high_accuracy);
        assert_eq!(settings.store_path, Some(PathBuf::from("/tmp/luna.json")));
        Ok(())
    }

    #[test]
    fn blank_values_keep_defaults() -> BridgeResult<()> {
        let settings = BridgeSettings::from_lookup(lookup(&[(ENV_FIX_TIMEOUT_MS, "  ")]))?;
        assert_eq!(settings.fix_options.timeout, Duration::from_secs(60));
        Ok(())
    }

    #[test]
    fn malformed_values_are_rejected() {
        let cases = [
            (ENV_CONFIGURE_URL, "goo.gl/fou7kz", "expected_http_url"),
            (ENV_FIX_TIMEOUT_MS, "soon", "expected_millis"),
            (ENV_FIX_TIMEOUT_MS, "0", "must_be_positive"),
            (ENV_FIX_MAX_AGE_MS, "-1", "expected_millis"),
            (ENV_FIX_HIGH_ACCURACY, "maybe", "expected_flag"),
        ];
        for (name, raw, expected_reason) in cases {
            let result = BridgeSettings::from_lookup(lookup(&[(name, raw)]));
            match result {
                Err(BridgeError::InvalidSetting {
                    name: got, reason, ..
                }) => {
                    assert_eq!(got, name);
                    assert_eq!(reason, expected_reason);
                }
                other => panic!("expected invalid setting for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn open_store_defaults_to_memory() -> BridgeResult<()> {
        let store = BridgeSettings::default().open_store()?;
        assert_eq!(store.get("TZ1").map_err(|source| BridgeError::config("get", source))?, None);
        Ok(())
    }
}
