#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Host-facing events and messages for the Luna companion bridge.
//!
//! Layout: `payloads.rs` (inbound host events and bridge diagnostics),
//! `message.rs` (outbound device messages), `transport.rs` (host send/open
//! seams), `routing.rs` (diagnostic event bus).

pub mod message;
pub mod payloads;
pub mod routing;
pub mod transport;

pub use message::{
    KEY_LATITUDE, KEY_LONGITUDE, LATITUDE_APP_KEY, LONGITUDE_APP_KEY, MessagePayload,
    MessageShape, MessageValue, OutboundMessage, TransactionId, app_key,
};
pub use payloads::{BridgeEvent, DEFAULT_REPLAY_CAPACITY, EventEnvelope, EventId, HostEvent};
pub use routing::{EventBus, EventStream};
pub use transport::{DeviceTransport, TransportError, UrlOpener};
