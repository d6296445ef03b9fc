//! Rounded-coordinate change detection.
//!
//! # Design
//! - Only whole-degree changes reach the watch; the raw pair is what gets sent.
//! - The first successful fix is always reported.
//! - Failures are logged and never retried; the next refresh starts over.
//! - Rounded state advances even when the send fails.

use luna_events::{DeviceTransport, OutboundMessage, TransactionId, TransportError};
use tracing::{debug, info, instrument, warn};

use crate::coords::{Coordinates, RoundedPosition};
use crate::error::LocationError;
use crate::service::{FixOptions, FixRequestId, LocationService};

/// What happened to one successful fix.
#[derive(Debug, Clone, PartialEq)]
pub enum FixOutcome {
    /// The rounded position changed and the raw pair was sent.
    Sent {
        /// New rounded position.
        rounded: RoundedPosition,
        /// Host transaction for the location update.
        transaction_id: TransactionId,
    },
    /// The rounded position matched the last one; nothing was sent.
    Unchanged {
        /// Rounded position that matched.
        rounded: RoundedPosition,
    },
    /// The rounded position changed but the host refused the message.
    SendFailed {
        /// New rounded position, recorded regardless.
        rounded: RoundedPosition,
        /// Transport failure.
        error: TransportError,
    },
    /// The fix could not be evaluated.
    Rejected {
        /// Reason the fix was dropped.
        error: LocationError,
    },
}

/// Tracks the last reported position and decides when to notify the watch.
#[derive(Debug, Clone, Default)]
pub struct LocationWatcher {
    options: FixOptions,
    last_rounded: Option<RoundedPosition>,
    last_transaction: Option<TransactionId>,
}

impl LocationWatcher {
    /// Watcher issuing requests with `options`.
    #[must_use]
    pub const fn new(options: FixOptions) -> Self {
        Self {
            options,
            last_rounded: None,
            last_transaction: None,
        }
    }

    /// Options attached to every request.
    #[must_use]
    pub const fn options(&self) -> &FixOptions {
        &self.options
    }

    /// Last rounded position, unset until the first successful fix.
    #[must_use]
    pub const fn last_rounded(&self) -> Option<RoundedPosition> {
        self.last_rounded
    }

    /// Transaction of the most recent location update.
    #[must_use]
    pub const fn last_transaction(&self) -> Option<TransactionId> {
        self.last_transaction
    }

    /// Issue a single-shot fix request.
    ///
    /// # Errors
    ///
    /// Returns the service error when the request cannot be issued.
    #[instrument(name = "location.request_fix", skip_all)]
    pub fn request_fix(&self, service: &dyn LocationService) -> Result<FixRequestId, LocationError> {
        match service.request_fix(&self.options) {
            Ok(request_id) => {
                debug!(
                    %request_id,
                    timeout_ms = self.options.timeout_ms(),
                    high_accuracy = self.options.enable_high_accuracy,
                    "requested position fix"
                );
                Ok(request_id)
            }
            Err(error) => {
                warn!(error = %error, code = error.code(), "position request not issued");
                Err(error)
            }
        }
    }

    /// Evaluate a successful fix and send it if the rounded position moved.
    #[instrument(
        name = "location.handle_fix",
        skip_all,
        fields(latitude = coordinates.latitude, longitude = coordinates.longitude)
    )]
    pub fn handle_fix(
        &mut self,
        coordinates: Coordinates,
        transport: &dyn DeviceTransport,
    ) -> FixOutcome {
        let rounded = match coordinates.rounded() {
            Ok(rounded) => rounded,
            Err(error) => {
                warn!(error = %error, "dropping position fix");
                return FixOutcome::Rejected { error };
            }
        };

        if self.last_rounded == Some(rounded) {
            debug!(%rounded, "position unchanged");
            return FixOutcome::Unchanged { rounded };
        }

        self.last_rounded = Some(rounded);
        let message = OutboundMessage::location_update(coordinates.latitude, coordinates.longitude);
        match transport.send_message(&message) {
            Ok(transaction_id) => {
                self.last_transaction = Some(transaction_id);
                info!(%rounded, %transaction_id, "sent location update");
                FixOutcome::Sent {
                    rounded,
                    transaction_id,
                }
            }
            Err(error) => {
                warn!(%rounded, error = %error, "location update not delivered");
                FixOutcome::SendFailed { rounded, error }
            }
        }
    }

    /// Log a failed fix. No watcher state depends on failures.
    pub fn handle_error(error: &LocationError) {
        warn!(error = %error, code = error.code(), "position fix failed");
    }
}
