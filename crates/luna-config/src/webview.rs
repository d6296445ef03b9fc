//! Parsing for the configuration form result.
//!
//! The form posts back a JSON object whose values may be strings, numbers or
//! missing. Parsing either yields a complete `ConfigurationSubmission` or fails
//! before anything is persisted.

use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{ConfigurationSubmission, IntegerField, NameField};

/// Parse the raw form response into a submission.
///
/// # Errors
///
/// Returns [`ConfigError::MalformedWebviewResult`] when `raw` is not JSON and
/// [`ConfigError::WebviewResultNotObject`] when it is JSON but not an object.
pub fn parse_webview_response(raw: &str) -> ConfigResult<ConfigurationSubmission> {
    let value: Value =
        serde_json::from_str(raw).map_err(|source| ConfigError::MalformedWebviewResult { source })?;
    let Value::Object(map) = value else {
        return Err(ConfigError::WebviewResultNotObject {
            kind: json_kind(&value),
        });
    };
    Ok(submission_from_map(&map))
}

fn submission_from_map(map: &Map<String, Value>) -> ConfigurationSubmission {
    let mut submission = ConfigurationSubmission::default();
    for field in NameField::ALL {
        submission.set_name(field, map.get(field.key()).and_then(name_text));
    }
    for field in IntegerField::ALL {
        submission.set_raw_integer(field, map.get(field.key()).and_then(integer_text));
    }
    submission
}

fn name_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn integer_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
