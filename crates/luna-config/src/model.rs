//! Typed configuration record and the raw submissions written to the store.
//!
//! # Design
//! - `ConfigurationRecord` is the defaulted, always-valid view held in memory.
//! - `ConfigurationSubmission` carries raw text exactly as it arrived, so parse
//!   failures can be persisted as the not-a-number marker and corrected on load.

use serde::{Deserialize, Serialize};

use crate::defaults::{
    CONFIGURE_URL, KEY_DMY, KEY_INVERT, KEY_LANG, KEY_LATITUDE, KEY_LONGITUDE, KEY_TZ1,
    KEY_TZ1_NAME, KEY_TZ2, KEY_TZ2_NAME, KEY_TZSS,
};

/// Integer-valued configuration fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IntegerField {
    /// First timezone offset.
    Tz1,
    /// Second timezone offset.
    Tz2,
    /// Configured latitude (not the live fix).
    Latitude,
    /// Configured longitude (not the live fix).
    Longitude,
    /// Seconds adjustment.
    Tzss,
    /// Inverted colours flag.
    Invert,
    /// Day-month-year date format flag.
    Dmy,
    /// Language index.
    Lang,
}

impl IntegerField {
    /// Every integer field in store order.
    pub const ALL: [Self; 8] = [
        Self::Tz1,
        Self::Tz2,
        Self::Latitude,
        Self::Longitude,
        Self::Tzss,
        Self::Invert,
        Self::Dmy,
        Self::Lang,
    ];

    /// Store and message key for the field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Tz1 => KEY_TZ1,
            Self::Tz2 => KEY_TZ2,
            Self::Latitude => KEY_LATITUDE,
            Self::Longitude => KEY_LONGITUDE,
            Self::Tzss => KEY_TZSS,
            Self::Invert => KEY_INVERT,
            Self::Dmy => KEY_DMY,
            Self::Lang => KEY_LANG,
        }
    }
}

/// Free-text label fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NameField {
    /// Label for the first timezone.
    Tz1Name,
    /// Label for the second timezone.
    Tz2Name,
}

impl NameField {
    /// Every name field in store order.
    pub const ALL: [Self; 2] = [Self::Tz1Name, Self::Tz2Name];

    /// Store and message key for the field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Tz1Name => KEY_TZ1_NAME,
            Self::Tz2Name => KEY_TZ2_NAME,
        }
    }
}

/// Defaulted configuration snapshot propagated to the watch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    /// Label for the first timezone, passed through as stored.
    #[serde(rename = "TZ1Name")]
    pub tz1_name: Option<String>,
    /// First timezone offset.
    #[serde(rename = "TZ1")]
    pub tz1: i64,
    /// Label for the second timezone, passed through as stored.
    #[serde(rename = "TZ2Name")]
    pub tz2_name: Option<String>,
    /// Second timezone offset.
    #[serde(rename = "TZ2")]
    pub tz2: i64,
    /// Seconds adjustment.
    #[serde(rename = "TZSS")]
    pub tzss: i64,
    /// Configured latitude.
    #[serde(rename = "LATITUDE")]
    pub latitude: i64,
    /// Configured longitude.
    #[serde(rename = "LONGITUDE")]
    pub longitude: i64,
    /// Inverted colours flag.
    pub invert: i64,
    /// Day-month-year date format flag.
    pub dmy: i64,
    /// Language index.
    pub lang: i64,
    /// Remote configuration form location.
    #[serde(rename = "configureUrl")]
    pub configure_url: String,
}

impl ConfigurationRecord {
    /// Record with every integer at zero, no names, and the given form URL.
    #[must_use]
    pub fn with_configure_url(configure_url: impl Into<String>) -> Self {
        Self {
            tz1_name: None,
            tz1: 0,
            tz2_name: None,
            tz2: 0,
            tzss: 0,
            latitude: 0,
            longitude: 0,
            invert: 0,
            dmy: 0,
            lang: 0,
            configure_url: configure_url.into(),
        }
    }

    /// Read an integer field.
    #[must_use]
    pub const fn integer(&self, field: IntegerField) -> i64 {
        match field {
            IntegerField::Tz1 => self.tz1,
            IntegerField::Tz2 => self.tz2,
            IntegerField::Latitude => self.latitude,
            IntegerField::Longitude => self.longitude,
            IntegerField::Tzss => self.tzss,
            IntegerField::Invert => self.invert,
            IntegerField::Dmy => self.dmy,
            IntegerField::Lang => self.lang,
        }
    }

    /// Overwrite an integer field.
    pub const fn set_integer(&mut self, field: IntegerField, value: i64) {
        let slot = match field {
            IntegerField::Tz1 => &mut self.tz1,
            IntegerField::Tz2 => &mut self.tz2,
            IntegerField::Latitude => &mut self.latitude,
            IntegerField::Longitude => &mut self.longitude,
            IntegerField::Tzss => &mut self.tzss,
            IntegerField::Invert => &mut self.invert,
            IntegerField::Dmy => &mut self.dmy,
            IntegerField::Lang => &mut self.lang,
        };
        *slot = value;
    }

    /// Read a name field.
    #[must_use]
    pub fn name(&self, field: NameField) -> Option<&str> {
        match field {
            NameField::Tz1Name => self.tz1_name.as_deref(),
            NameField::Tz2Name => self.tz2_name.as_deref(),
        }
    }

    /// Overwrite a name field.
    pub fn set_name(&mut self, field: NameField, value: Option<String>) {
        match field {
            NameField::Tz1Name => self.tz1_name = value,
            NameField::Tz2Name => self.tz2_name = value,
        }
    }
}

impl Default for ConfigurationRecord {
    fn default() -> Self {
        Self::with_configure_url(CONFIGURE_URL)
    }
}

/// Raw configuration values awaiting persistence.
///
/// Integer fields hold the text that will be parsed on save; `None` means the
/// value was missing or not a scalar and is persisted as the not-a-number marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationSubmission {
    /// Label for the first timezone.
    pub tz1_name: Option<String>,
    /// Label for the second timezone.
    pub tz2_name: Option<String>,
    /// Raw first timezone offset.
    pub tz1: Option<String>,
    /// Raw second timezone offset.
    pub tz2: Option<String>,
    /// Raw seconds adjustment.
    pub tzss: Option<String>,
    /// Raw configured latitude.
    pub latitude: Option<String>,
    /// Raw configured longitude.
    pub longitude: Option<String>,
    /// Raw inverted colours flag.
    pub invert: Option<String>,
    /// Raw date format flag.
    pub dmy: Option<String>,
    /// Raw language index.
    pub lang: Option<String>,
}

impl ConfigurationSubmission {
    /// Raw text for an integer field.
    #[must_use]
    pub fn raw_integer(&self, field: IntegerField) -> Option<&str> {
        match field {
            IntegerField::Tz1 => self.tz1.as_deref(),
            IntegerField::Tz2 => self.tz2.as_deref(),
            IntegerField::Latitude => self.latitude.as_deref(),
            IntegerField::Longitude => self.longitude.as_deref(),
            IntegerField::Tzss => self.tzss.as_deref(),
            IntegerField::Invert => self.invert.as_deref(),
            IntegerField::Dmy => self.dmy.as_deref(),
            IntegerField::Lang => self.lang.as_deref(),
        }
    }

    /// Replace the raw text for an integer field.
    pub fn set_raw_integer(&mut self, field: IntegerField, value: Option<String>) {
        let slot = match field {
            IntegerField::Tz1 => &mut self.tz1,
            IntegerField::Tz2 => &mut self.tz2,
            IntegerField::Latitude => &mut self.latitude,
            IntegerField::Longitude => &mut self.longitude,
            IntegerField::Tzss => &mut self.tzss,
            IntegerField::Invert => &mut self.invert,
            IntegerField::Dmy => &mut self.dmy,
            IntegerField::Lang => &mut self.lang,
        };
        *slot = value;
    }

    /// Label for a name field.
    #[must_use]
    pub fn name(&self, field: NameField) -> Option<&str> {
        match field {
            NameField::Tz1Name => self.tz1_name.as_deref(),
            NameField::Tz2Name => self.tz2_name.as_deref(),
        }
    }

    /// Replace the label for a name field.
    pub fn set_name(&mut self, field: NameField, value: Option<String>) {
        match field {
            NameField::Tz1Name => self.tz1_name = value,
            NameField::Tz2Name => self.tz2_name = value,
        }
    }
}

impl From<&ConfigurationRecord> for ConfigurationSubmission {
    fn from(record: &ConfigurationRecord) -> Self {
        let mut submission = Self {
            tz1_name: record.tz1_name.clone(),
            tz2_name: record.tz2_name.clone(),
            ..Self::default()
        };
        for field in IntegerField::ALL {
            submission.set_raw_integer(field, Some(record.integer(field).to_string()));
        }
        submission
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_zeroed_with_constant_url() {
        let record = ConfigurationRecord::default();
        for field in IntegerField::ALL {
            assert_eq!(record.integer(field), 0);
        }
        assert!(record.tz1_name.is_none());
        assert!(record.tz2_name.is_none());
        assert_eq!(record.configure_url, CONFIGURE_URL);
    }

    #[test]
    fn integer_accessors_address_distinct_fields() {
        let mut record = ConfigurationRecord::default();
        for (index, field) in IntegerField::ALL.into_iter().enumerate() {
            record.set_integer(field, i64::try_from(index).unwrap_or_default() + 1);
        }
        assert_eq!(record.tz1, 1);
        assert_eq!(record.tz2, 2);
        assert_eq!(record.latitude, 3);
        assert_eq!(record.longitude, 4);
        assert_eq!(record.tzss, 5);
        assert_eq!(record.invert, 6);
        assert_eq!(record.dmy, 7);
        assert_eq!(record.lang, 8);
    }

    #[test]
    fn submission_from_record_renders_integers() {
        let mut record = ConfigurationRecord::default();
        record.tz1 = -300;
        record.lang = 2;
        record.set_name(NameField::Tz2Name, Some("Tokyo".into()));

        let submission = ConfigurationSubmission::from(&record);
        assert_eq!(submission.raw_integer(IntegerField::Tz1), Some("-300"));
        assert_eq!(submission.raw_integer(IntegerField::Lang), Some("2"));
        assert_eq!(submission.raw_integer(IntegerField::Dmy), Some("0"));
        assert_eq!(submission.name(NameField::Tz2Name), Some("Tokyo"));
        assert_eq!(submission.name(NameField::Tz1Name), None);
    }

    #[test]
    fn record_serializes_with_store_keys() {
        let record = ConfigurationRecord::default();
        let value = serde_json::to_value(&record).unwrap_or_default();
        assert_eq!(value["TZ1"], 0);
        assert_eq!(value["configureUrl"], CONFIGURE_URL);
        assert!(value["TZ1Name"].is_null());
        assert_eq!(value["invert"], 0);
    }
}
