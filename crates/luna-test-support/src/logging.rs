//! Test subscriber installation.

use std::sync::Once;

use luna_telemetry::{LoggingConfig, init_logging};

static INIT: Once = Once::new();

/// Install a compact debug subscriber once per test binary.
///
/// Installation failures are ignored so suites that already installed a
/// subscriber keep theirs.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = init_logging(&LoggingConfig::for_tests());
    });
}
