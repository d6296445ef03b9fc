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

//! Live position tracking for the Luna companion bridge.
//!
//! The watch only cares about whole-degree changes, so fixes are rounded and
//! compared against the last reported position before anything is sent.

pub mod coords;
pub mod error;
pub mod provider;
pub mod service;
pub mod watcher;

pub use coords::{Coordinates, RoundedPosition, round_half_up};
pub use error::LocationError;
pub use provider::PositionProvider;
pub use service::{FixOptions, FixRequestId, LocationService};
pub use watcher::{FixOutcome, LocationWatcher};
