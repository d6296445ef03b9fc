//! Recording fakes for every host seam.
//!
//! Each fake records what it was asked to do and can be switched into a
//! failing mode at any time.

use std::collections::{BTreeMap, VecDeque};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use luna_config::{ConfigError, ConfigResult, KeyValueStore, MemoryStore};
use luna_events::{
    DeviceTransport, MessageShape, OutboundMessage, TransactionId, TransportError, UrlOpener,
};
use luna_location::{
    Coordinates, FixOptions, FixRequestId, LocationError, LocationService, PositionProvider,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Transport that records messages and hands out increasing transaction ids.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<OutboundMessage>>,
    next_id: AtomicU64,
    failing: AtomicBool,
}

impl RecordingTransport {
    /// Accepting transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle failing mode; failing sends are not recorded.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every accepted message, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<OutboundMessage> {
        lock(&self.sent).clone()
    }

    /// Accepted messages of one shape.
    #[must_use]
    pub fn sent_with_shape(&self, shape: MessageShape) -> Vec<OutboundMessage> {
        lock(&self.sent)
            .iter()
            .filter(|message| message.shape() == shape)
            .cloned()
            .collect()
    }
}

impl DeviceTransport for RecordingTransport {
    fn send_message(&self, message: &OutboundMessage) -> Result<TransactionId, TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Unavailable {
                operation: "send_message",
            });
        }
        lock(&self.sent).push(message.clone());
        Ok(TransactionId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

/// URL opener that records every URL.
#[derive(Debug, Default)]
pub struct RecordingUrlOpener {
    opened: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl RecordingUrlOpener {
    /// Accepting opener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle failing mode.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// URLs opened so far.
    #[must_use]
    pub fn opened(&self) -> Vec<String> {
        lock(&self.opened).clone()
    }
}

impl UrlOpener for RecordingUrlOpener {
    fn open_url(&self, url: &str) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Rejected {
                operation: "open_url",
                reason: "webview unavailable".into(),
            });
        }
        lock(&self.opened).push(url.to_string());
        Ok(())
    }
}

/// Location service that records requests without resolving them.
#[derive(Debug, Default)]
pub struct RecordingLocationService {
    requests: Mutex<Vec<(FixRequestId, FixOptions)>>,
    failing: AtomicBool,
}

impl RecordingLocationService {
    /// Accepting service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle failing mode.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Requests issued so far.
    #[must_use]
    pub fn requests(&self) -> Vec<(FixRequestId, FixOptions)> {
        lock(&self.requests).clone()
    }

    /// Number of requests issued.
    #[must_use]
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl LocationService for RecordingLocationService {
    fn request_fix(&self, options: &FixOptions) -> Result<FixRequestId, LocationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(LocationError::Unavailable {
                message: "location services disabled".into(),
            });
        }
        let request_id = FixRequestId::new_v4();
        lock(&self.requests).push((request_id, *options));
        Ok(request_id)
    }
}

/// In-memory store that counts mutations and can refuse writes.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    writes: AtomicU64,
    failing: AtomicBool,
}

impl RecordingStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `entries`; seeding is not counted as writes.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            inner: MemoryStore::with_entries(entries),
            ..Self::default()
        }
    }

    /// Toggle failing mode for `set` and `remove`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful `set` and `remove` calls.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Snapshot of the stored entries.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.inner.entries()
    }

    fn check_writable(&self, operation: &'static str) -> ConfigResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ConfigError::StoreIo {
                operation,
                path: PathBuf::from("memory"),
                source: io::Error::other("injected write failure"),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for RecordingStore {
    fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> ConfigResult<()> {
        self.check_writable("set")?;
        self.inner.set(key, value)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> ConfigResult<()> {
        self.check_writable("remove")?;
        self.inner.remove(key)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// One scripted answer from [`ScriptedPositionProvider`].
#[derive(Debug, Clone)]
pub struct ScriptedFix {
    /// Time to wait before answering.
    pub delay: Duration,
    /// Answer to return.
    pub result: Result<Coordinates, LocationError>,
}

impl ScriptedFix {
    /// Immediate success.
    #[must_use]
    pub const fn at(coordinates: Coordinates) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(coordinates),
        }
    }

    /// Immediate failure.
    #[must_use]
    pub const fn fail(error: LocationError) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(error),
        }
    }

    /// Same answer after `delay`.
    #[must_use]
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Async provider that replays scripted answers in order.
///
/// Once the script is exhausted every call reports the position source as
/// unavailable.
#[derive(Debug, Default)]
pub struct ScriptedPositionProvider {
    script: Mutex<VecDeque<ScriptedFix>>,
    calls: AtomicU64,
}

impl ScriptedPositionProvider {
    /// Provider answering with `script` in order.
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = ScriptedFix>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicU64::new(0),
        }
    }

    /// Append one more answer.
    pub fn push(&self, fix: ScriptedFix) {
        lock(&self.script).push_back(fix);
    }

    /// Number of positions requested so far.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PositionProvider for ScriptedPositionProvider {
    async fn current_position(&self, _options: &FixOptions) -> Result<Coordinates, LocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = lock(&self.script).pop_front();
        let Some(fix) = next else {
            return Err(LocationError::Unavailable {
                message: "script exhausted".into(),
            });
        };
        if !fix.delay.is_zero() {
            tokio::time::sleep(fix.delay).await;
        }
        fix.result
    }
}
