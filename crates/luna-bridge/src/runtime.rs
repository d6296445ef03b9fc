//! Tokio driver that feeds host events and fix outcomes into one controller.
//!
//! # Design
//! - A single task owns the controller, so events are handled sequentially.
//! - Fix requests run as detached tasks bounded by the fix timeout; their
//!   outcomes come back through a channel into the same loop.
//! - Closing the host channel stops the loop. Fixes still in flight are dropped.

use std::sync::Arc;

use luna_config::KeyValueStore;
use luna_events::{DeviceTransport, EventBus, EventStream, HostEvent, UrlOpener};
use luna_location::{
    Coordinates, FixOptions, FixRequestId, LocationError, LocationService, PositionProvider,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::controller::{ConfigSyncController, HostBindings};
use crate::error::{BridgeError, BridgeResult};
use crate::settings::BridgeSettings;

const HOST_EVENT_CAPACITY: usize = 64;

/// Host capabilities for a runtime-driven bridge.
#[derive(Clone)]
pub struct RuntimeBindings {
    /// Persistent key-value medium.
    pub store: Arc<dyn KeyValueStore>,
    /// Message channel to the watch.
    pub transport: Arc<dyn DeviceTransport>,
    /// Opens the settings form.
    pub opener: Arc<dyn UrlOpener>,
    /// Async position source.
    pub positions: Arc<dyn PositionProvider>,
}

#[derive(Debug)]
enum FixReport {
    Resolved {
        request_id: FixRequestId,
        coordinates: Coordinates,
    },
    Failed {
        request_id: FixRequestId,
        error: LocationError,
    },
}

/// Location service that resolves requests on spawned tasks.
struct SpawningLocationService {
    positions: Arc<dyn PositionProvider>,
    reports: mpsc::UnboundedSender<FixReport>,
}

impl LocationService for SpawningLocationService {
    fn request_fix(&self, options: &FixOptions) -> Result<FixRequestId, LocationError> {
        if self.reports.is_closed() {
            return Err(LocationError::RequestFailed {
                message: "bridge runtime stopped".to_string(),
            });
        }
        let request_id = FixRequestId::new_v4();
        let positions = Arc::clone(&self.positions);
        let reports = self.reports.clone();
        let options = *options;
        tokio::spawn(async move {
            let report = match tokio::time::timeout(
                options.timeout,
                positions.current_position(&options),
            )
            .await
            {
                Ok(Ok(coordinates)) => FixReport::Resolved {
                    request_id,
                    coordinates,
                },
                Ok(Err(error)) => FixReport::Failed { request_id, error },
                Err(_) => FixReport::Failed {
                    request_id,
                    error: LocationError::Timeout {
                        timeout_ms: options.timeout_ms(),
                    },
                },
            };
            if reports.send(report).is_err() {
                debug!(%request_id, "bridge stopped before fix resolved");
            }
        });
        Ok(request_id)
    }
}

/// Entry point for running a bridge on the current tokio runtime.
#[derive(Debug, Clone, Copy)]
pub struct BridgeRuntime;

impl BridgeRuntime {
    /// Spawn the controller loop. Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(bindings: RuntimeBindings, settings: &BridgeSettings) -> BridgeHandle {
        let (host_tx, mut host_rx) = mpsc::channel::<HostEvent>(HOST_EVENT_CAPACITY);
        let (fix_tx, mut fix_rx) = mpsc::unbounded_channel::<FixReport>();

        let RuntimeBindings {
            store,
            transport,
            opener,
            positions,
        } = bindings;
        let location = Arc::new(SpawningLocationService {
            positions,
            reports: fix_tx,
        });
        let mut controller = ConfigSyncController::new(
            HostBindings {
                store,
                transport,
                opener,
                location,
            },
            settings,
        );
        let events = controller.events().clone();

        let task = tokio::spawn(async move {
            info!("bridge runtime started");
            loop {
                tokio::select! {
                    event = host_rx.recv() => {
                        match event {
                            Some(event) => {
                                let kind = event.kind();
                                if let Err(err) = controller.handle(event) {
                                    warn!(
                                        error = %err,
                                        operation = err.operation().unwrap_or(kind),
                                        "host event handling failed"
                                    );
                                }
                            }
                            None => break,
                        }
                    }
                    Some(report) = fix_rx.recv() => {
                        match report {
                            FixReport::Resolved { request_id, coordinates } => {
                                debug!(%request_id, "position fix resolved");
                                let _ = controller.on_location_fix(coordinates);
                            }
                            FixReport::Failed { request_id, error } => {
                                debug!(%request_id, code = error.code(), "position fix failed");
                                controller.on_location_error(&error);
                            }
                        }
                    }
                }
            }
            info!("bridge runtime stopped");
            controller
        });

        BridgeHandle {
            sender: host_tx,
            events,
            task,
        }
    }
}

/// Handle to a running bridge.
#[derive(Debug)]
pub struct BridgeHandle {
    sender: mpsc::Sender<HostEvent>,
    events: EventBus,
    task: JoinHandle<ConfigSyncController>,
}

impl BridgeHandle {
    /// Queue a host event.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::RuntimeStopped`] if the loop has exited.
    pub async fn send(&self, event: HostEvent) -> BridgeResult<()> {
        self.sender
            .send(event)
            .await
            .map_err(|_| BridgeError::RuntimeStopped)
    }

    /// Diagnostic event bus shared with the controller.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribe to diagnostics emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> EventStream {
        self.events.subscribe()
    }

    /// Stop accepting events, let queued ones finish and return the controller.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::RuntimeJoin`] if the loop task panicked.
    pub async fn shutdown(self) -> BridgeResult<ConfigSyncController> {
        drop(self.sender);
        self.task
            .await
            .map_err(|source| BridgeError::RuntimeJoin { source })
    }
}
