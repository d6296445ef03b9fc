//! Store keys and fixed values for the configuration record.
//!
//! # Design
//! - Keys match the names the watch and the configuration form already use.
//! - The configure URL is compiled in; it is never read back from the store.

/// Remote configuration form opened when the user asks to configure the watchface.
pub const CONFIGURE_URL: &str = "http://goo.gl/fou7kz";

/// Marker written for an integer field whose value could not be parsed.
pub const NOT_A_NUMBER: &str = "NaN";

/// Text written for a name field the configuration form left out.
pub const MISSING_NAME: &str = "";

/// Value substituted for any integer field that fails to parse on load.
pub const INTEGER_DEFAULT: i64 = 0;

pub(crate) const KEY_TZ1_NAME: &str = "TZ1Name";
pub(crate) const KEY_TZ2_NAME: &str = "TZ2Name";
pub(crate) const KEY_TZ1: &str = "TZ1";
pub(crate) const KEY_TZ2: &str = "TZ2";
pub(crate) const KEY_TZSS: &str = "TZSS";
pub(crate) const KEY_LATITUDE: &str = "LATITUDE";
pub(crate) const KEY_LONGITUDE: &str = "LONGITUDE";
pub(crate) const KEY_INVERT: &str = "invert";
pub(crate) const KEY_DMY: &str = "dmy";
pub(crate) const KEY_LANG: &str = "lang";
