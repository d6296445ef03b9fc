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

//! Companion bridge between a phone host and the Luna watchface.
//!
//! Layout: `controller.rs` (`ConfigSyncController` and its lifecycle),
//! `runtime.rs` (tokio event loop), `settings.rs` (environment settings),
//! `error.rs` (`BridgeError`).

pub mod controller;
pub mod error;
pub mod runtime;
pub mod settings;

pub use controller::{ConfigSyncController, HostBindings, SyncPhase, WebviewOutcome};
pub use error::{BridgeError, BridgeResult};
pub use runtime::{BridgeHandle, BridgeRuntime, RuntimeBindings};
pub use settings::BridgeSettings;
