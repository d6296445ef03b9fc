use std::sync::Arc;
use std::time::Duration;

use luna_bridge::{BridgeRuntime, BridgeSettings, RuntimeBindings, SyncPhase};
use luna_config::{JsonFileStore, KeyValueStore};
use luna_events::{
    BridgeEvent, EventStream, HostEvent, MessageShape, MessageValue, TransactionId,
};
use luna_location::{Coordinates, LocationError, RoundedPosition};
use luna_test_support::fixtures::{NEAR_NEW_YORK, NEW_YORK, TZ1_ONLY_RESPONSE};
use luna_test_support::logging::init_test_logging;
use luna_test_support::mocks::{
    RecordingStore, RecordingTransport, RecordingUrlOpener, ScriptedFix, ScriptedPositionProvider,
};
use tempfile::TempDir;
use tokio_stream::StreamExt;

const WAIT: Duration = Duration::from_secs(5);

struct Host {
    transport: Arc<RecordingTransport>,
    opener: Arc<RecordingUrlOpener>,
    positions: Arc<ScriptedPositionProvider>,
}

fn bindings(store: Arc<dyn KeyValueStore>, script: Vec<ScriptedFix>) -> (RuntimeBindings, Host) {
    init_test_logging();
    let host = Host {
        transport: Arc::new(RecordingTransport::new()),
        opener: Arc::new(RecordingUrlOpener::new()),
        positions: Arc::new(ScriptedPositionProvider::new(script)),
    };
    let bindings = RuntimeBindings {
        store,
        transport: host.transport.clone(),
        opener: host.opener.clone(),
        positions: host.positions.clone(),
    };
    (bindings, host)
}

async fn next_event(stream: &mut EventStream) -> anyhow::Result<BridgeEvent> {
    let item = tokio::time::timeout(WAIT, stream.next())
        .await?
        .ok_or_else(|| anyhow::anyhow!("event stream closed"))?;
    Ok(item?.event)
}

#[tokio::test]
async fn ready_and_refresh_report_only_changed_positions() -> anyhow::Result<()> {
    let (bindings, host) = bindings(
        Arc::new(RecordingStore::new()),
        vec![ScriptedFix::at(NEW_YORK), ScriptedFix::at(NEAR_NEW_YORK)],
    );
    let handle = BridgeRuntime::spawn(bindings, &BridgeSettings::default());
    let mut stream = handle.subscribe();

    handle.send(HostEvent::Ready).await?;
    assert!(matches!(
        next_event(&mut stream).await?,
        BridgeEvent::LocationSent { .. }
    ));

    handle.send(HostEvent::RefreshRequested).await?;
    assert!(matches!(
        next_event(&mut stream).await?,
        BridgeEvent::LocationUnchanged {
            latitude: 41,
            longitude: -74
        }
    ));

    let controller = handle.shutdown().await?;
    assert_eq!(controller.phase(), SyncPhase::Running);
    assert_eq!(
        controller.live_location(),
        Some(RoundedPosition {
            latitude: 41,
            longitude: -74
        })
    );
    assert_eq!(host.transport.sent().len(), 1);
    assert_eq!(host.positions.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn overlapping_fixes_share_change_detection() -> anyhow::Result<()> {
    let (bindings, host) = bindings(
        Arc::new(RecordingStore::new()),
        vec![
            ScriptedFix::at(Coordinates::new(40.7, -74.0)).after(Duration::from_millis(50)),
            ScriptedFix::at(Coordinates::new(40.9, -73.9)).after(Duration::from_millis(10)),
        ],
    );
    let handle = BridgeRuntime::spawn(bindings, &BridgeSettings::default());
    let mut stream = handle.subscribe();

    handle.send(HostEvent::Ready).await?;
    handle.send(HostEvent::RefreshRequested).await?;

    // The refresh resolves first and wins; the slower startup fix rounds the same.
    assert_eq!(
        next_event(&mut stream).await?,
        BridgeEvent::LocationSent {
            latitude: 40.9,
            longitude: -73.9,
            transaction_id: TransactionId(1),
        }
    );
    assert_eq!(
        next_event(&mut stream).await?,
        BridgeEvent::LocationUnchanged {
            latitude: 41,
            longitude: -74
        }
    );

    let controller = handle.shutdown().await?;
    assert_eq!(controller.phase(), SyncPhase::Running);
    assert_eq!(host.transport.sent_with_shape(MessageShape::LocationUpdate).len(), 1);
    assert_eq!(host.positions.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn slow_fix_times_out_without_sending() -> anyhow::Result<()> {
    let (bindings, host) = bindings(
        Arc::new(RecordingStore::new()),
        vec![ScriptedFix::at(NEW_YORK).after(Duration::from_secs(30))],
    );
    let mut settings = BridgeSettings::default();
    settings.fix_options.timeout = Duration::from_millis(20);
    let handle = BridgeRuntime::spawn(bindings, &settings);
    let mut stream = handle.subscribe();

    handle.send(HostEvent::Ready).await?;
    let event = next_event(&mut stream).await?;
    let timeout_message = LocationError::Timeout { timeout_ms: 20 }.to_string();
    assert_eq!(
        event,
        BridgeEvent::LocationFailed {
            message: timeout_message
        }
    );

    let controller = handle.shutdown().await?;
    assert_eq!(controller.live_location(), None);
    assert!(host.transport.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn provider_errors_are_reported_as_failures() -> anyhow::Result<()> {
    let (bindings, host) = bindings(
        Arc::new(RecordingStore::new()),
        vec![ScriptedFix::fail(LocationError::PermissionDenied)],
    );
    let handle = BridgeRuntime::spawn(bindings, &BridgeSettings::default());
    let mut stream = handle.subscribe();

    handle.send(HostEvent::Ready).await?;
    assert!(matches!(
        next_event(&mut stream).await?,
        BridgeEvent::LocationFailed { .. }
    ));

    let controller = handle.shutdown().await?;
    assert_eq!(controller.phase(), SyncPhase::Running);
    assert!(host.transport.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn settings_round_trip_through_runtime_and_file_store() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("luna.json");
    let store = Arc::new(JsonFileStore::open(&path)?);
    let (bindings, host) = bindings(store, Vec::new());
    let handle = BridgeRuntime::spawn(bindings, &BridgeSettings::default());
    let mut stream = handle.subscribe();

    handle.send(HostEvent::ConfigurationRequested).await?;
    assert!(matches!(
        next_event(&mut stream).await?,
        BridgeEvent::ConfigurationFormOpened { .. }
    ));
    handle
        .send(HostEvent::WebviewClosed {
            response: Some(TZ1_ONLY_RESPONSE.to_string()),
        })
        .await?;
    assert_eq!(next_event(&mut stream).await?, BridgeEvent::ConfigurationSaved);
    assert!(matches!(
        next_event(&mut stream).await?,
        BridgeEvent::ConfigurationPropagated { .. }
    ));

    let controller = handle.shutdown().await?;
    assert_eq!(controller.snapshot().tz1, 5);
    assert_eq!(host.opener.opened().len(), 1);
    let sent = host.transport.sent_with_shape(MessageShape::FullConfiguration);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].get("TZ1"), Some(&MessageValue::Int(5)));

    let reopened = JsonFileStore::open(&path)?;
    assert_eq!(reopened.get("TZ1")?.as_deref(), Some("5"));
    Ok(())
}

#[tokio::test]
async fn errors_do_not_stop_the_loop() -> anyhow::Result<()> {
    let (bindings, host) = bindings(Arc::new(RecordingStore::new()), Vec::new());
    let handle = BridgeRuntime::spawn(bindings, &BridgeSettings::default());
    let mut stream = handle.subscribe();

    handle
        .send(HostEvent::WebviewClosed {
            response: Some("not json".to_string()),
        })
        .await?;
    assert!(matches!(
        next_event(&mut stream).await?,
        BridgeEvent::WebviewRejected { .. }
    ));

    handle
        .send(HostEvent::WebviewClosed { response: None })
        .await?;
    assert_eq!(next_event(&mut stream).await?, BridgeEvent::WebviewIgnored);

    let controller = handle.shutdown().await?;
    assert_eq!(controller.last_config_transaction(), None);
    assert!(host.transport.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn shutdown_drains_queued_host_events() -> anyhow::Result<()> {
    let (bindings, host) = bindings(Arc::new(RecordingStore::new()), Vec::new());
    let handle = BridgeRuntime::spawn(bindings, &BridgeSettings::default());

    handle.send(HostEvent::ConfigurationRequested).await?;
    let events = handle.events().clone();
    let controller = handle.shutdown().await?;

    assert_eq!(controller.phase(), SyncPhase::AwaitingWebview);
    assert_eq!(host.opener.opened().len(), 1);
    let kinds: Vec<_> = events.backlog().iter().map(BridgeEvent::kind).collect();
    assert_eq!(kinds, ["configuration_form_opened"]);
    Ok(())
}
