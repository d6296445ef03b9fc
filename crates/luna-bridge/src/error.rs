//! # Design
//!
//! - One error type for controller and runtime entry points.
//! - Messages stay constant; context lives in fields and sources.
//! - Callers log once at the dispatch boundary.

use luna_config::ConfigError;
use luna_events::TransportError;
use luna_location::LocationError;
use thiserror::Error;

/// Result alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Bridge-level error type.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Reading, writing or parsing configuration failed.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: ConfigError,
    },
    /// Requesting a position failed.
    #[error("location operation failed")]
    Location {
        /// Operation identifier.
        operation: &'static str,
        /// Source location error.
        source: LocationError,
    },
    /// The host refused to send a message or open a page.
    #[error("host transport operation failed")]
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// Source transport error.
        source: TransportError,
    },
    /// A setting could not be parsed.
    #[error("invalid bridge setting")]
    InvalidSetting {
        /// Environment variable name.
        name: &'static str,
        /// Raw value that was rejected.
        value: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The runtime task is no longer accepting events.
    #[error("bridge runtime stopped")]
    RuntimeStopped,
    /// The runtime task panicked or was cancelled.
    #[error("bridge runtime task failed")]
    RuntimeJoin {
        /// Source join error.
        source: tokio::task::JoinError,
    },
}

impl BridgeError {
    pub(crate) const fn config(operation: &'static str, source: ConfigError) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn location(operation: &'static str, source: LocationError) -> Self {
        Self::Location { operation, source }
    }

    pub(crate) const fn transport(operation: &'static str, source: TransportError) -> Self {
        Self::Transport { operation, source }
    }

    pub(crate) fn invalid_setting(
        name: &'static str,
        value: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidSetting {
            name,
            value: value.into(),
            reason,
        }
    }

    /// Operation identifier when the error wraps a lower-level failure.
    #[must_use]
    pub const fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Config { operation, .. }
            | Self::Location { operation, .. }
            | Self::Transport { operation, .. } => Some(*operation),
            Self::InvalidSetting { .. } | Self::RuntimeStopped | Self::RuntimeJoin { .. } => None,
        }
    }
}
