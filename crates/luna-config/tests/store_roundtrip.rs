use std::sync::Arc;

use luna_config::{
    CONFIGURE_URL, ConfigurationRecord, ConfigurationSubmission, IntegerField, JsonFileStore,
    KeyValueStore, MemoryStore, PersistedConfigStore, parse_webview_response,
};
use tempfile::TempDir;

const INVALID_VALUES: [&str; 4] = ["", "abc", "NaN", "undefined"];

#[test]
fn load_after_save_always_yields_valid_integers() -> anyhow::Result<()> {
    let backend = Arc::new(MemoryStore::new());
    let store = PersistedConfigStore::new(backend);

    // Walk every subset of the integer fields, marking the chosen ones invalid.
    for mask in 0_u16..(1 << IntegerField::ALL.len()) {
        let mut submission = ConfigurationSubmission::default();
        for (bit, field) in IntegerField::ALL.into_iter().enumerate() {
            let raw = if mask & (1 << bit) == 0 {
                (bit + 1).to_string()
            } else {
                INVALID_VALUES[bit % INVALID_VALUES.len()].to_string()
            };
            submission.set_raw_integer(field, Some(raw));
        }

        store.save(&submission)?;
        let record = store.load()?;

        for (bit, field) in IntegerField::ALL.into_iter().enumerate() {
            let expected = if mask & (1 << bit) == 0 {
                i64::try_from(bit + 1)?
            } else {
                0
            };
            assert_eq!(record.integer(field), expected, "mask {mask:#b} field {field:?}");
        }
        assert_eq!(record.configure_url, CONFIGURE_URL);
    }
    Ok(())
}

#[test]
fn webview_submission_round_trips_through_file_store() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("luna.json");
    let raw = r#"{"TZ1Name":"EST","TZ1":"-300","TZ2Name":"CET","TZ2":"60","TZSS":"0",
        "LATITUDE":"52","LONGITUDE":"13","invert":"1","dmy":"1","lang":"4"}"#;

    {
        let store = PersistedConfigStore::new(Arc::new(JsonFileStore::open(&path)?));
        store.save(&parse_webview_response(raw)?)?;
    }

    let backend = Arc::new(JsonFileStore::open(&path)?);
    assert_eq!(backend.get("TZ1")?.as_deref(), Some("-300"));
    let record = PersistedConfigStore::new(backend).load()?;

    let expected = ConfigurationRecord {
        tz1_name: Some("EST".into()),
        tz1: -300,
        tz2_name: Some("CET".into()),
        tz2: 60,
        tzss: 0,
        latitude: 52,
        longitude: 13,
        invert: 1,
        dmy: 1,
        lang: 4,
        configure_url: CONFIGURE_URL.to_string(),
    };
    assert_eq!(record, expected);
    Ok(())
}

#[test]
fn saving_a_loaded_record_is_stable() -> anyhow::Result<()> {
    let backend = Arc::new(MemoryStore::with_entries([
        ("TZ1Name", "Lisbon"),
        ("TZ2Name", ""),
        ("TZ1", "7.5"),
        ("TZ2", " -2"),
        ("lang", "0x2"),
    ]));
    let store = PersistedConfigStore::new(backend.clone());

    let first = store.load()?;
    store.save_record(&first)?;
    let second = store.load()?;

    assert_eq!(first, second);
    assert_eq!(second.tz1, 7);
    assert_eq!(second.tz2, -2);
    assert_eq!(second.lang, 2);
    assert_eq!(backend.entries().get("TZ2").map(String::as_str), Some("-2"));
    Ok(())
}
