//! Error types for position acquisition.

use thiserror::Error;

/// Failures while acquiring or evaluating a position fix.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LocationError {
    /// The platform has no position source.
    #[error("position source unavailable")]
    Unavailable {
        /// Platform-provided detail.
        message: String,
    },
    /// The user denied access to position data.
    #[error("position permission denied")]
    PermissionDenied,
    /// No fix arrived within the configured timeout.
    #[error("position fix timed out")]
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },
    /// The fix carried a component that is not a finite number.
    #[error("position fix has invalid coordinates")]
    InvalidCoordinates {
        /// Latitude as reported.
        latitude: f64,
        /// Longitude as reported.
        longitude: f64,
    },
    /// Issuing the request itself failed.
    #[error("position request failed")]
    RequestFailed {
        /// Platform-provided detail.
        message: String,
    },
}

impl LocationError {
    /// Short machine-friendly label for logs and diagnostics.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "unavailable",
            Self::PermissionDenied => "permission_denied",
            Self::Timeout { .. } => "timeout",
            Self::InvalidCoordinates { .. } => "invalid_coordinates",
            Self::RequestFailed { .. } => "request_failed",
        }
    }
}
