//! Typed persistence for the configuration record.
//!
//! # Design
//! - `save` coerces integer fields before writing and records parse failures
//!   as the not-a-number marker rather than failing.
//! - `load` runs the defaulting pass so every integer in the returned record is
//!   valid, and always stamps the compiled-in configure URL.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::backend::KeyValueStore;
use crate::coerce::{coerce_int_or_default, parse_js_int};
use crate::defaults::{CONFIGURE_URL, INTEGER_DEFAULT, MISSING_NAME, NOT_A_NUMBER};
use crate::error::ConfigResult;
use crate::model::{ConfigurationRecord, ConfigurationSubmission, IntegerField, NameField};

/// Reads and writes the configuration record through a key-value medium.
#[derive(Clone)]
pub struct PersistedConfigStore {
    backend: Arc<dyn KeyValueStore>,
    configure_url: String,
}

impl fmt::Debug for PersistedConfigStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PersistedConfigStore")
            .field("configure_url", &self.configure_url)
            .finish_non_exhaustive()
    }
}

impl PersistedConfigStore {
    /// Wrap `backend` using the default configure URL.
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_configure_url(backend, CONFIGURE_URL)
    }

    /// Wrap `backend`, stamping `configure_url` on every loaded record.
    #[must_use]
    pub fn with_configure_url(
        backend: Arc<dyn KeyValueStore>,
        configure_url: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            configure_url: configure_url.into(),
        }
    }

    /// URL stamped on loaded records.
    #[must_use]
    pub fn configure_url(&self) -> &str {
        &self.configure_url
    }

    /// Persist every field of `submission`.
    ///
    /// Every one of the ten keys is written. Integer fields are parsed first;
    /// unparsable values are written as [`NOT_A_NUMBER`]. Missing names are
    /// written as [`MISSING_NAME`].
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium rejects a write.
    #[instrument(name = "config_store.save", skip_all)]
    pub fn save(&self, submission: &ConfigurationSubmission) -> ConfigResult<()> {
        debug!(?submission, "saving configuration");
        for field in NameField::ALL {
            let name = submission.name(field).unwrap_or(MISSING_NAME);
            self.backend.set(field.key(), name)?;
        }
        for field in IntegerField::ALL {
            let encoded = submission
                .raw_integer(field)
                .and_then(parse_js_int)
                .map_or_else(|| NOT_A_NUMBER.to_string(), |value| value.to_string());
            self.backend.set(field.key(), &encoded)?;
        }
        Ok(())
    }

    /// Persist an already-validated record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium rejects a write.
    pub fn save_record(&self, record: &ConfigurationRecord) -> ConfigResult<()> {
        self.save(&ConfigurationSubmission::from(record))
    }

    /// Load the record and apply the defaulting pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    #[instrument(name = "config_store.load", skip_all)]
    pub fn load(&self) -> ConfigResult<ConfigurationRecord> {
        let mut record = ConfigurationRecord::with_configure_url(self.configure_url.clone());
        for field in NameField::ALL {
            record.set_name(field, self.backend.get(field.key())?);
        }
        for field in IntegerField::ALL {
            let raw = self.backend.get(field.key())?;
            let value = coerce_int_or_default(raw.as_deref(), INTEGER_DEFAULT);
            if raw.is_some() && raw.as_deref().and_then(parse_js_int).is_none() {
                debug!(key = field.key(), raw = ?raw, "defaulted invalid stored field");
            }
            record.set_integer(field, value);
        }
        debug!(?record, "loaded configuration");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;

    fn store_with(backend: &Arc<MemoryStore>) -> PersistedConfigStore {
        PersistedConfigStore::new(backend.clone())
    }

    #[test]
    fn save_writes_nan_marker_for_invalid_integers() -> ConfigResult<()> {
        let backend = Arc::new(MemoryStore::new());
        let store = store_with(&backend);
        let submission = ConfigurationSubmission {
            tz1: Some("five".into()),
            tz2: Some("-60".into()),
            ..ConfigurationSubmission::default()
        };

        store.save(&submission)?;
        let entries = backend.entries();
        assert_eq!(entries.get("TZ1").map(String::as_str), Some(NOT_A_NUMBER));
        assert_eq!(entries.get("TZ2").map(String::as_str), Some("-60"));
        assert_eq!(entries.get("lang").map(String::as_str), Some(NOT_A_NUMBER));
        Ok(())
    }

    #[test]
    fn save_writes_every_key_even_without_names() -> ConfigResult<()> {
        let backend = Arc::new(MemoryStore::with_entries([("TZ1Name", "Old")]));
        let store = store_with(&backend);
        let submission = ConfigurationSubmission {
            tz1: Some("5".into()),
            ..ConfigurationSubmission::default()
        };

        store.save(&submission)?;
        let entries = backend.entries();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries.get("TZ1Name").map(String::as_str), Some(MISSING_NAME));
        assert_eq!(entries.get("TZ2Name").map(String::as_str), Some(MISSING_NAME));

        let record = store.load()?;
        assert_eq!(record.tz1_name.as_deref(), Some(""));
        assert_eq!(record.tz1, 5);
        Ok(())
    }

    #[test]
    fn load_from_empty_store_is_fully_defaulted() -> ConfigResult<()> {
        let backend = Arc::new(MemoryStore::new());
        let record = store_with(&backend).load()?;
        assert_eq!(record, ConfigurationRecord::default());
        Ok(())
    }

    #[test]
    fn load_defaults_invalid_fields_and_keeps_names_raw() -> ConfigResult<()> {
        let backend = Arc::new(MemoryStore::with_entries([
            ("TZ1Name", ""),
            ("TZ1", "NaN"),
            ("TZ2", "120"),
            ("LATITUDE", "51"),
            ("dmy", "yes"),
        ]));
        let record = store_with(&backend).load()?;
        assert_eq!(record.tz1_name.as_deref(), Some(""));
        assert_eq!(record.tz2_name, None);
        assert_eq!(record.tz1, 0);
        assert_eq!(record.tz2, 120);
        assert_eq!(record.latitude, 51);
        assert_eq!(record.dmy, 0);
        Ok(())
    }

    #[test]
    fn load_stamps_configured_url() -> ConfigResult<()> {
        let backend = Arc::new(MemoryStore::with_entries([("configureUrl", "http://evil")]));
        let store = PersistedConfigStore::with_configure_url(backend, "http://form.local/");
        assert_eq!(store.load()?.configure_url, "http://form.local/");
        assert_eq!(store.configure_url(), "http://form.local/");
        Ok(())
    }
}
