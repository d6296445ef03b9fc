//! Logging setup errors.

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

/// Result alias for logging setup.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Failures while configuring or installing the log subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber")]
    SubscriberInstall {
        /// Underlying install error.
        #[source]
        source: TryInitError,
    },
    /// The requested output format is not recognised.
    #[error("unknown log format")]
    UnknownFormat {
        /// Environment variable the value came from.
        variable: &'static str,
        /// Rejected value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn unknown_format_keeps_context_out_of_message() {
        let err = TelemetryError::UnknownFormat {
            variable: "LUNA_LOG_FORMAT",
            value: "xml".to_string(),
        };
        assert_eq!(err.to_string(), "unknown log format");
        assert!(err.source().is_none());
        assert!(format!("{err:?}").contains("xml"));
    }
}
