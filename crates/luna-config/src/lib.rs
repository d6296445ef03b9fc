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

//! Persisted watchface configuration for the Luna companion bridge.
//!
//! Layout: `model.rs` (typed record and raw submissions), `coerce.rs` (integer
//! parsing and defaulting), `defaults.rs` (store keys and constants),
//! `backend.rs` (key-value media), `store.rs` (`PersistedConfigStore`),
//! `webview.rs` (configuration form result parsing).

pub mod backend;
pub mod coerce;
pub mod defaults;
pub mod error;
pub mod model;
pub mod store;
pub mod webview;

pub use backend::{JsonFileStore, KeyValueStore, MemoryStore};
pub use coerce::{coerce_int_or_default, parse_js_int};
pub use defaults::{CONFIGURE_URL, MISSING_NAME, NOT_A_NUMBER};
pub use error::{ConfigError, ConfigResult};
pub use model::{ConfigurationRecord, ConfigurationSubmission, IntegerField, NameField};
pub use store::PersistedConfigStore;
pub use webview::parse_webview_response;
