//! Tracing subscriber installation.
//!
//! # Design
//! - One entry point installs a global fmt subscriber in the requested format.
//! - `RUST_LOG` overrides the configured level when present.
//! - Hosts pick level and format through `LUNA_LOG_LEVEL` / `LUNA_LOG_FORMAT`.

use std::env;
use std::str::FromStr;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, TelemetryError};

/// Default level directive when neither `RUST_LOG` nor `LUNA_LOG_LEVEL` is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Environment variable holding the level directive.
pub const ENV_LOG_LEVEL: &str = "LUNA_LOG_LEVEL";
/// Environment variable holding the output format name.
pub const ENV_LOG_FORMAT: &str = "LUNA_LOG_FORMAT";

/// Install the global tracing subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::SubscriberInstall`] when a global subscriber is
/// already set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true).with_target(false))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(false))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_test_writer())
            .try_init(),
    };
    installed.map_err(|source| TelemetryError::SubscriberInstall { source })
}

/// Level and format for the bridge's log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Level directive, e.g. `info` or `luna_bridge=debug`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Verbose compact output routed through the test harness.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Compact,
        }
    }

    /// Read overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::UnknownFormat`] for an unrecognised format name.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::UnknownFormat`] for an unrecognised format name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.level = level.trim().to_string();
        }
        if let Some(format) = read(ENV_LOG_FORMAT) {
            config.format = format.parse()?;
        }
        Ok(config)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::infer(),
        }
    }
}

/// Output formats for the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Multi-field human-readable lines.
    Pretty,
    /// Single-line output captured by the test harness.
    Compact,
}

impl LogFormat {
    /// Pretty in debug builds, JSON otherwise.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            _ => Err(TelemetryError::UnknownFormat {
                variable: ENV_LOG_FORMAT,
                value: value.to_string(),
            }),
        }
    }
}
