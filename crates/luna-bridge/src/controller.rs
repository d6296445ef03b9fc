//! Configuration and location synchronisation between host and watch.
//!
//! # Design
//! - One controller owns the configuration snapshot, the live position and all
//!   host seams; events are processed one at a time to completion.
//! - Startup and refresh only request a position. Configuration is loaded and
//!   sent to the watch only after the settings form returns a result.
//! - A malformed form result is dropped before anything is written.
//! - No failure is fatal: errors are returned to the dispatcher, logged there
//!   and published on the event bus.

use std::fmt;
use std::sync::Arc;

use luna_config::{
    ConfigurationRecord, KeyValueStore, PersistedConfigStore, parse_webview_response,
};
use luna_events::{
    BridgeEvent, DeviceTransport, EventBus, HostEvent, OutboundMessage, TransactionId, UrlOpener,
};
use luna_location::{
    Coordinates, FixOutcome, FixRequestId, LocationError, LocationService, LocationWatcher,
    RoundedPosition,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{BridgeError, BridgeResult};
use crate::settings::BridgeSettings;

/// Host capabilities the controller drives.
#[derive(Clone)]
pub struct HostBindings {
    /// Persistent key-value medium.
    pub store: Arc<dyn KeyValueStore>,
    /// Message channel to the watch.
    pub transport: Arc<dyn DeviceTransport>,
    /// Opens the settings form.
    pub opener: Arc<dyn UrlOpener>,
    /// Issues position requests.
    pub location: Arc<dyn LocationService>,
}

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// The host has not signalled readiness yet.
    Uninitialized,
    /// Ready was received and the first fix has not resolved.
    AwaitingFirstFix,
    /// Normal operation.
    Running,
    /// The settings form is open.
    AwaitingWebview,
}

/// Result of handling a closed settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebviewOutcome {
    /// The form closed without a response; nothing changed.
    Ignored,
    /// The response was saved and the configuration sent to the watch.
    Applied {
        /// Host transaction for the full-configuration message.
        transaction_id: TransactionId,
    },
}

/// Drives configuration persistence and position updates for one watchface.
pub struct ConfigSyncController {
    store: PersistedConfigStore,
    transport: Arc<dyn DeviceTransport>,
    opener: Arc<dyn UrlOpener>,
    location: Arc<dyn LocationService>,
    watcher: LocationWatcher,
    events: EventBus,
    snapshot: ConfigurationRecord,
    phase: SyncPhase,
    ready: bool,
    first_fix_resolved: bool,
    last_config_transaction: Option<TransactionId>,
}

impl fmt::Debug for ConfigSyncController {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ConfigSyncController")
            .field("phase", &self.phase)
            .field("snapshot", &self.snapshot)
            .field("live_location", &self.watcher.last_rounded())
            .finish_non_exhaustive()
    }
}

impl ConfigSyncController {
    /// Build a controller over `bindings`.
    ///
    /// The snapshot starts as the defaulted record carrying the configured
    /// form URL; nothing is read from the store until a form result arrives.
    #[must_use]
    pub fn new(bindings: HostBindings, settings: &BridgeSettings) -> Self {
        let HostBindings {
            store,
            transport,
            opener,
            location,
        } = bindings;
        Self {
            store: PersistedConfigStore::with_configure_url(store, settings.configure_url.clone()),
            transport,
            opener,
            location,
            watcher: LocationWatcher::new(settings.fix_options),
            events: EventBus::with_capacity(settings.event_replay_capacity),
            snapshot: ConfigurationRecord::with_configure_url(settings.configure_url.clone()),
            phase: SyncPhase::Uninitialized,
            ready: false,
            first_fix_resolved: false,
            last_config_transaction: None,
        }
    }

    /// Current in-memory configuration.
    #[must_use]
    pub const fn snapshot(&self) -> &ConfigurationRecord {
        &self.snapshot
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Diagnostic event bus.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Last rounded position reported to the watch.
    #[must_use]
    pub const fn live_location(&self) -> Option<RoundedPosition> {
        self.watcher.last_rounded()
    }

    /// Transaction of the last full-configuration message.
    #[must_use]
    pub const fn last_config_transaction(&self) -> Option<TransactionId> {
        self.last_config_transaction
    }

    /// Transaction of the last location-update message.
    #[must_use]
    pub const fn last_location_transaction(&self) -> Option<TransactionId> {
        self.watcher.last_transaction()
    }

    /// Dispatch one host event.
    ///
    /// # Errors
    ///
    /// Returns the failure of the handler the event was routed to.
    pub fn handle(&mut self, event: HostEvent) -> BridgeResult<()> {
        debug!(kind = event.kind(), "handling host event");
        match event {
            HostEvent::Ready => self.on_ready().map(|_| ()),
            HostEvent::RefreshRequested => self.on_refresh_requested().map(|_| ()),
            HostEvent::ConfigurationRequested => self.on_configuration_requested(),
            HostEvent::WebviewClosed { response } => {
                self.on_webview_result(response.as_deref()).map(|_| ())
            }
        }
    }

    /// The host finished starting: ask for the first position.
    ///
    /// # Errors
    ///
    /// Returns an error when the position request cannot be issued.
    #[instrument(name = "bridge.on_ready", skip_all)]
    pub fn on_ready(&mut self) -> BridgeResult<FixRequestId> {
        info!("bridge ready");
        self.ready = true;
        self.settle();
        self.request_fix("bridge.on_ready")
    }

    /// The watch asked for a fresh position.
    ///
    /// # Errors
    ///
    /// Returns an error when the position request cannot be issued.
    #[instrument(name = "bridge.on_refresh_requested", skip_all)]
    pub fn on_refresh_requested(&mut self) -> BridgeResult<FixRequestId> {
        self.request_fix("bridge.on_refresh_requested")
    }

    /// Open the settings form at the snapshot's URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot open the form; the phase is left
    /// unchanged in that case.
    #[instrument(name = "bridge.on_configuration_requested", skip_all)]
    pub fn on_configuration_requested(&mut self) -> BridgeResult<()> {
        let url = self.snapshot.configure_url.clone();
        self.opener
            .open_url(&url)
            .map_err(|source| BridgeError::transport("bridge.open_form", source))?;
        info!(%url, "opened configuration form");
        self.phase = SyncPhase::AwaitingWebview;
        self.events
            .publish(BridgeEvent::ConfigurationFormOpened { url });
        Ok(())
    }

    /// Apply the settings form result.
    ///
    /// An absent or empty response changes nothing. Otherwise the response is
    /// parsed, saved, reloaded into the snapshot and sent to the watch.
    ///
    /// # Errors
    ///
    /// Returns an error when the response is malformed (nothing is written),
    /// when the store fails, or when the watch cannot be reached.
    #[instrument(name = "bridge.on_webview_result", skip_all)]
    pub fn on_webview_result(&mut self, response: Option<&str>) -> BridgeResult<WebviewOutcome> {
        if self.phase == SyncPhase::AwaitingWebview {
            self.phase = self.settled_phase();
        }

        let Some(raw) = response.filter(|raw| !raw.is_empty()) else {
            debug!("configuration form closed without a response");
            self.events.publish(BridgeEvent::WebviewIgnored);
            return Ok(WebviewOutcome::Ignored);
        };

        let submission = match parse_webview_response(raw) {
            Ok(submission) => submission,
            Err(source) => {
                warn!(error = %source, "dropping malformed configuration result");
                self.events.publish(BridgeEvent::WebviewRejected {
                    message: source.to_string(),
                });
                return Err(BridgeError::config("bridge.parse_webview", source));
            }
        };

        self.store
            .save(&submission)
            .map_err(|source| BridgeError::config("bridge.save", source))?;
        self.events.publish(BridgeEvent::ConfigurationSaved);
        self.snapshot = self
            .store
            .load()
            .map_err(|source| BridgeError::config("bridge.load", source))?;

        let transaction_id = self.propagate()?;
        Ok(WebviewOutcome::Applied { transaction_id })
    }

    /// Send the snapshot to the watch as the full-configuration message.
    ///
    /// # Errors
    ///
    /// Returns an error when the host refuses the message.
    #[instrument(name = "bridge.propagate", skip_all)]
    pub fn propagate(&mut self) -> BridgeResult<TransactionId> {
        let message = OutboundMessage::full_configuration(&self.snapshot);
        debug!(payload = %message.to_json(), "sending configuration");
        let transaction_id = self
            .transport
            .send_message(&message)
            .map_err(|source| BridgeError::transport("bridge.propagate", source))?;
        self.last_config_transaction = Some(transaction_id);
        info!(%transaction_id, "configuration sent to watch");
        self.events
            .publish(BridgeEvent::ConfigurationPropagated { transaction_id });
        Ok(transaction_id)
    }

    /// Feed a successful position fix.
    pub fn on_location_fix(&mut self, coordinates: Coordinates) -> FixOutcome {
        let outcome = self.watcher.handle_fix(coordinates, self.transport.as_ref());
        let event = match &outcome {
            FixOutcome::Sent { transaction_id, .. } => BridgeEvent::LocationSent {
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
                transaction_id: *transaction_id,
            },
            FixOutcome::Unchanged { rounded } => BridgeEvent::LocationUnchanged {
                latitude: rounded.latitude,
                longitude: rounded.longitude,
            },
            FixOutcome::SendFailed { error, .. } => BridgeEvent::LocationFailed {
                message: error.to_string(),
            },
            FixOutcome::Rejected { error } => BridgeEvent::LocationFailed {
                message: error.to_string(),
            },
        };
        self.events.publish(event);
        self.resolve_fix();
        outcome
    }

    /// Feed a failed position fix. Nothing is sent and no retry is made.
    pub fn on_location_error(&mut self, error: &LocationError) {
        LocationWatcher::handle_error(error);
        self.events.publish(BridgeEvent::LocationFailed {
            message: error.to_string(),
        });
        self.resolve_fix();
    }

    fn request_fix(&mut self, operation: &'static str) -> BridgeResult<FixRequestId> {
        match self.watcher.request_fix(self.location.as_ref()) {
            Ok(request_id) => Ok(request_id),
            Err(source) => {
                // A request that never started resolves as a failed fix.
                self.on_location_error(&source);
                Err(BridgeError::location(operation, source))
            }
        }
    }

    fn resolve_fix(&mut self) {
        self.first_fix_resolved = true;
        self.settle();
    }

    fn settle(&mut self) {
        if self.phase != SyncPhase::AwaitingWebview {
            self.phase = self.settled_phase();
        }
    }

    const fn settled_phase(&self) -> SyncPhase {
        match (self.ready, self.first_fix_resolved) {
            (false, _) => SyncPhase::Uninitialized,
            (true, false) => SyncPhase::AwaitingFirstFix,
            (true, true) => SyncPhase::Running,
        }
    }
}
