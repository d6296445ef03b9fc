//! Async position source used by runtime drivers.

use async_trait::async_trait;

use crate::coords::Coordinates;
use crate::error::LocationError;
use crate::service::FixOptions;

/// Resolves one position fix asynchronously.
///
/// Implementations may ignore `options.timeout`; callers bound the wait
/// themselves and report [`LocationError::Timeout`] when it elapses.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Acquire the current position.
    ///
    /// # Errors
    ///
    /// Returns an error when the platform cannot produce a fix.
    async fn current_position(&self, options: &FixOptions) -> Result<Coordinates, LocationError>;
}
