//! Outbound device messages.
//!
//! # Design
//! - A message is a flat key to scalar map; the host transport owns the wire encoding.
//! - Two disjoint shapes exist and are never mixed in one message.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use luna_config::{ConfigurationRecord, IntegerField, MISSING_NAME, NameField};
use serde::{Deserialize, Serialize};

/// Message key carrying the live longitude.
pub const KEY_LONGITUDE: &str = "KEY_LONGITUDE";
/// Message key carrying the live latitude.
pub const KEY_LATITUDE: &str = "KEY_LATITUDE";
/// Numeric app key the watch registers for [`KEY_LONGITUDE`].
pub const LONGITUDE_APP_KEY: u32 = 0;
/// Numeric app key the watch registers for [`KEY_LATITUDE`].
pub const LATITUDE_APP_KEY: u32 = 1;

/// Numeric app key for a named location key, for transports that address by number.
#[must_use]
pub fn app_key(name: &str) -> Option<u32> {
    match name {
        KEY_LONGITUDE => Some(LONGITUDE_APP_KEY),
        KEY_LATITUDE => Some(LATITUDE_APP_KEY),
        _ => None,
    }
}

/// Opaque identifier returned by the host for each send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl Display for TransactionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Scalar carried under a message key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageValue {
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
}

/// Flat key to value mapping sent to the device.
pub type MessagePayload = BTreeMap<String, MessageValue>;

/// Which of the two outbound shapes a message has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageShape {
    /// Every persisted configuration field.
    FullConfiguration,
    /// Raw live coordinates.
    LocationUpdate,
}

impl MessageShape {
    /// Lowercase label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullConfiguration => "full_configuration",
            Self::LocationUpdate => "location_update",
        }
    }
}

/// Message handed to the host transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    shape: MessageShape,
    payload: MessagePayload,
}

impl OutboundMessage {
    /// Build the full-configuration shape from `record`.
    ///
    /// All ten fields are present; an absent name is sent as
    /// [`MISSING_NAME`].
    #[must_use]
    pub fn full_configuration(record: &ConfigurationRecord) -> Self {
        let mut payload = MessagePayload::new();
        for field in NameField::ALL {
            let name = record.name(field).unwrap_or(MISSING_NAME);
            payload.insert(field.key().to_string(), MessageValue::Text(name.to_string()));
        }
        for field in IntegerField::ALL {
            payload.insert(
                field.key().to_string(),
                MessageValue::Int(record.integer(field)),
            );
        }
        Self {
            shape: MessageShape::FullConfiguration,
            payload,
        }
    }

    /// Build the location-update shape from raw coordinates.
    #[must_use]
    pub fn location_update(latitude: f64, longitude: f64) -> Self {
        let payload = MessagePayload::from([
            (KEY_LONGITUDE.to_string(), MessageValue::Float(longitude)),
            (KEY_LATITUDE.to_string(), MessageValue::Float(latitude)),
        ]);
        Self {
            shape: MessageShape::LocationUpdate,
            payload,
        }
    }

    /// Shape of this message.
    #[must_use]
    pub const fn shape(&self) -> MessageShape {
        self.shape
    }

    /// Key to value mapping.
    #[must_use]
    pub const fn payload(&self) -> &MessagePayload {
        &self.payload
    }

    /// Value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MessageValue> {
        self.payload.get(key)
    }

    /// Render the payload as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.payload).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_configuration_carries_ten_fields() {
        let mut record = ConfigurationRecord::default();
        record.tz1_name = Some("EST".into());
        record.tz2_name = Some("CET".into());
        record.tz1 = 5;

        let message = OutboundMessage::full_configuration(&record);
        assert_eq!(message.shape(), MessageShape::FullConfiguration);
        assert_eq!(message.payload().len(), 10);
        assert_eq!(message.get("TZ1"), Some(&MessageValue::Int(5)));
        assert_eq!(message.get("TZ1Name"), Some(&MessageValue::Text("EST".into())));
        assert!(message.get("configureUrl").is_none());
    }

    #[test]
    fn full_configuration_sends_absent_names_as_empty_text() {
        let message = OutboundMessage::full_configuration(&ConfigurationRecord::default());
        assert_eq!(message.payload().len(), 10);
        assert_eq!(message.get("TZ2Name"), Some(&MessageValue::Text(String::new())));
    }

    #[test]
    fn location_update_keeps_raw_floats() {
        let message = OutboundMessage::location_update(40.7128, -74.006);
        assert_eq!(message.shape(), MessageShape::LocationUpdate);
        assert_eq!(message.get(KEY_LATITUDE), Some(&MessageValue::Float(40.7128)));
        assert_eq!(message.get(KEY_LONGITUDE), Some(&MessageValue::Float(-74.006)));
        assert_eq!(message.to_json()["KEY_LATITUDE"], 40.7128);
    }

    #[test]
    fn app_keys_match_watch_registration() {
        assert_eq!(app_key(KEY_LONGITUDE), Some(0));
        assert_eq!(app_key(KEY_LATITUDE), Some(1));
        assert_eq!(app_key("TZ1"), None);
    }
}
