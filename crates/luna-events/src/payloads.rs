//! Event payload types for the bridge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::TransactionId;

/// Identifier assigned to each diagnostic event.
pub type EventId = u64;

/// Default number of recent events the bus keeps.
pub const DEFAULT_REPLAY_CAPACITY: usize = 256;

/// Lifecycle notifications delivered by the host environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The host finished starting the bridge.
    Ready,
    /// The watch asked for a fresh position.
    RefreshRequested,
    /// The user opened the settings screen.
    ConfigurationRequested,
    /// The settings webview closed.
    WebviewClosed {
        /// Raw response string; absent or empty when the user cancelled.
        response: Option<String>,
    },
}

impl HostEvent {
    /// Machine-friendly discriminator for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::RefreshRequested => "refresh_requested",
            Self::ConfigurationRequested => "configuration_requested",
            Self::WebviewClosed { .. } => "webview_closed",
        }
    }
}

/// Diagnostic events emitted by the controller as it works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEvent {
    /// The full configuration was handed to the transport.
    ConfigurationPropagated {
        /// Host transaction for the send.
        transaction_id: TransactionId,
    },
    /// A webview submission was written to the store.
    ConfigurationSaved,
    /// The settings form was opened.
    ConfigurationFormOpened {
        /// URL handed to the host.
        url: String,
    },
    /// A changed position was sent to the watch.
    LocationSent {
        /// Raw latitude sent.
        latitude: f64,
        /// Raw longitude sent.
        longitude: f64,
        /// Host transaction for the send.
        transaction_id: TransactionId,
    },
    /// A fix rounded to the last sent position and was dropped.
    LocationUnchanged {
        /// Rounded latitude.
        latitude: i64,
        /// Rounded longitude.
        longitude: i64,
    },
    /// Acquiring or sending a position failed.
    LocationFailed {
        /// Human-readable failure detail.
        message: String,
    },
    /// The webview closed without a response.
    WebviewIgnored,
    /// The webview response could not be parsed.
    WebviewRejected {
        /// Human-readable failure detail.
        message: String,
    },
}

impl BridgeEvent {
    /// Machine-friendly discriminator for subscribers.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ConfigurationPropagated { .. } => "configuration_propagated",
            Self::ConfigurationSaved => "configuration_saved",
            Self::ConfigurationFormOpened { .. } => "configuration_form_opened",
            Self::LocationSent { .. } => "location_sent",
            Self::LocationUnchanged { .. } => "location_unchanged",
            Self::LocationFailed { .. } => "location_failed",
            Self::WebviewIgnored => "webview_ignored",
            Self::WebviewRejected { .. } => "webview_rejected",
        }
    }
}

/// Metadata wrapper around events. Each envelope tracks the event id and emission timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Monotonic identifier assigned by the bus.
    pub id: EventId,
    /// Emission time.
    pub timestamp: DateTime<Utc>,
    /// Wrapped event.
    pub event: BridgeEvent,
}
