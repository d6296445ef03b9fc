//! Error types for configuration operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration form returned a payload that is not valid JSON.
    #[error("malformed webview result")]
    MalformedWebviewResult {
        /// Source JSON error.
        source: serde_json::Error,
    },
    /// The configuration form returned valid JSON that is not an object.
    #[error("webview result is not an object")]
    WebviewResultNotObject {
        /// JSON kind that was received instead (`array`, `string`, ...).
        kind: &'static str,
    },
    /// A file-backed store could not be read or written.
    #[error("key-value store io failed")]
    StoreIo {
        /// Operation identifier.
        operation: &'static str,
        /// Path of the backing file.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// A file-backed store contained data that is not a string map.
    #[error("key-value store contents are corrupt")]
    StoreCorrupt {
        /// Path of the backing file.
        path: PathBuf,
        /// Source JSON error.
        source: serde_json::Error,
    },
    /// Encoding the store contents failed.
    #[error("key-value store encoding failed")]
    StoreEncode {
        /// Source JSON error.
        source: serde_json::Error,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
