//! Integer parsing and defaulting for loosely typed configuration values.
//!
//! Values reach the bridge as text: from the key-value store and from the
//! configuration form. Both are parsed with the same lenient rules the form and
//! the watch agree on, so `"5"`, `" 5"`, `"5px"` and `"5.9"` all mean `5`.

/// Parse the longest integer prefix of `text`.
///
/// Leading whitespace is skipped, a single `+`/`-` sign is accepted, and a
/// `0x`/`0X` prefix switches to hexadecimal. Parsing stops at the first
/// character that is not a digit in the active radix. Returns `None` when no
/// digit was consumed or the value does not fit in an `i64`.
#[must_use]
pub fn parse_js_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, unsigned) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = trimmed.strip_prefix('+') {
        (false, rest)
    } else {
        (false, trimmed)
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x" | "0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let end = digits
        .find(|ch: char| !ch.is_digit(radix))
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if negative {
        i64::from_str_radix(&format!("-{digits}"), radix).ok()
    } else {
        i64::from_str_radix(digits, radix).ok()
    }
}

/// Parse `raw` as an integer, substituting `default` when it is absent or invalid.
#[must_use]
pub fn coerce_int_or_default(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(parse_js_int).unwrap_or(default)
}
