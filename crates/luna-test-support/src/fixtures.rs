//! Sample payloads and positions.

use luna_location::Coordinates;

/// Configuration form response with every field filled in.
pub const FULL_WEBVIEW_RESPONSE: &str = r#"{"TZ1Name":"New York","TZ1":"-5","TZ2Name":"Tokyo","TZ2":"9","TZSS":"1","LATITUDE":"40","LONGITUDE":"-74","invert":"1","dmy":"0","lang":"2"}"#;

/// Response that only changes the first zone offset.
pub const TZ1_ONLY_RESPONSE: &str = r#"{"TZ1":"5"}"#;

/// Response that is not valid JSON.
pub const MALFORMED_WEBVIEW_RESPONSE: &str = r#"{"TZ1":"5""#;

/// Lower Manhattan.
pub const NEW_YORK: Coordinates = Coordinates::new(40.7128, -74.0060);

/// A point that rounds to the same whole degrees as [`NEW_YORK`].
pub const NEAR_NEW_YORK: Coordinates = Coordinates::new(40.9, -73.8);

/// Central London.
pub const LONDON: Coordinates = Coordinates::new(51.5072, -0.1276);
