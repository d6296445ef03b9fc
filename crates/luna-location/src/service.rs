//! Platform position request seam.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LocationError;

/// Default time allowed for a single fix.
pub const DEFAULT_FIX_TIMEOUT: Duration = Duration::from_secs(60);

/// Options attached to every fix request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixOptions {
    /// How long the platform may take before reporting a timeout.
    pub timeout: Duration,
    /// Oldest cached fix the platform may return; zero forces a fresh fix.
    pub maximum_age: Duration,
    /// Whether to request high-accuracy positioning.
    pub enable_high_accuracy: bool,
}

impl FixOptions {
    /// Timeout expressed in whole milliseconds, saturating at `u64::MAX`.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FIX_TIMEOUT,
            maximum_age: Duration::ZERO,
            enable_high_accuracy: false,
        }
    }
}

/// Identifier for an in-flight fix request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixRequestId(pub Uuid);

impl FixRequestId {
    /// Allocate a fresh random identifier.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for FixRequestId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, formatter)
    }
}

/// Starts single-shot position requests.
///
/// Implementations return as soon as the request is issued. The outcome is
/// reported later through the owner's success or failure path; requests are
/// never cancelled.
pub trait LocationService: Send + Sync {
    /// Issue one fix request with `options`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be issued at all.
    fn request_fix(&self, options: &FixOptions) -> Result<FixRequestId, LocationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_force_fresh_standard_fix() {
        let options = FixOptions::default();
        assert_eq!(options.timeout_ms(), 60_000);
        assert_eq!(options.maximum_age, Duration::ZERO);
        assert!(!options.enable_high_accuracy);
    }

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(FixRequestId::new_v4(), FixRequestId::new_v4());
    }
}
