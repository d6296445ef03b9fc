//! Host seams for talking to the watch and opening the settings page.

use thiserror::Error;

use crate::message::{OutboundMessage, TransactionId};

/// Failures reported by a host transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The host refused the operation.
    #[error("host rejected operation")]
    Rejected {
        /// Operation that was attempted.
        operation: &'static str,
        /// Host-provided reason.
        reason: String,
    },
    /// No device or browser is connected.
    #[error("host transport unavailable")]
    Unavailable {
        /// Operation that was attempted.
        operation: &'static str,
    },
}

/// Sends messages to the watch.
///
/// Delivery is fire-and-forget from the bridge's point of view: a returned
/// transaction id only means the host accepted the message.
pub trait DeviceTransport: Send + Sync {
    /// Hand `message` to the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the message outright.
    fn send_message(&self, message: &OutboundMessage) -> Result<TransactionId, TransportError>;
}

/// Opens the external settings page.
pub trait UrlOpener: Send + Sync {
    /// Ask the host to show `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot open a webview.
    fn open_url(&self, url: &str) -> Result<(), TransportError>;
}
