//! Catalog records and catalog file I/O.
//!
//! Records are read as raw JSON objects so that the schema validator can
//! inspect their exact key sets; validation turns them into the typed
//! [`Speaker`], [`Category`] and [`Event`] structs below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{IcsGenError, IcsGenResult};
use crate::utils::write_atomic;

/// A raw, not yet validated catalog record.
pub type RawRecord = Map<String, Value>;

pub const EVENTS_KEY: &str = "events";
pub const SPEAKERS_KEY: &str = "speakers";
pub const CATEGORIES_KEY: &str = "categories";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A catalog event. Field order here is the order of the rewritten file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub date: String,
    pub duration: String,
    pub location: String,
    #[serde(rename = "locationURL")]
    pub location_url: String,
    pub speakers: Vec<i64>,
    pub category: i64,
    pub description: String,
    /// Public URL of the generated artifact (empty until generation)
    #[serde(rename = "icsURL")]
    pub ics_url: String,
}

#[derive(Serialize)]
struct EventsFile<'a> {
    events: &'a [Event],
}

/// Read the collection stored under `key` in the JSON file at `path`.
///
/// Malformed JSON, a missing key, a non-array collection or a non-object
/// entry all abort before any validation happens.
pub fn load_collection(path: &Path, key: &str) -> IcsGenResult<Vec<RawRecord>> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content).map_err(|source| IcsGenError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    collection_from_value(value, key).map_err(|message| IcsGenError::Schema {
        record: path.display().to_string(),
        message,
    })
}

fn collection_from_value(value: Value, key: &str) -> Result<Vec<RawRecord>, String> {
    let Value::Object(mut top) = value else {
        return Err("top-level value is not an object".to_string());
    };

    let Some(collection) = top.remove(key) else {
        return Err(format!("missing top-level key '{}'", key));
    };

    let Value::Array(entries) = collection else {
        return Err(format!("'{}' is not a list", key));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| match entry {
            Value::Object(record) => Ok(record),
            other => Err(format!("{}[{}] is not an object: {}", key, i, other)),
        })
        .collect()
}

/// Rewrite the events file as pretty-printed `{"events": [...]}`.
pub fn save_events(path: &Path, events: &[Event]) -> IcsGenResult<()> {
    let mut content = serde_json::to_string_pretty(&EventsFile { events }).map_err(|source| {
        IcsGenError::Json {
            path: path.to_path_buf(),
            source,
        }
    })?;
    content.push('\n');

    write_atomic(path, content.as_bytes())?;
    tracing::info!(path = %path.display(), events = events.len(), "rewrote catalog");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_event() -> Event {
        Event {
            name: "Talk".to_string(),
            date: "2022-06-15T10:00".to_string(),
            duration: "1h".to_string(),
            location: "Room1".to_string(),
            location_url: "https://x.com".to_string(),
            speakers: vec![1],
            category: 1,
            description: "desc".to_string(),
            ics_url: String::new(),
        }
    }

    #[test]
    fn test_collection_requires_key() {
        let err = collection_from_value(json!({"speakers": []}), EVENTS_KEY).unwrap_err();
        assert!(err.contains("missing top-level key 'events'"), "{}", err);
    }

    #[test]
    fn test_collection_rejects_non_object_entries() {
        let err = collection_from_value(json!({"events": [{}, 3]}), EVENTS_KEY).unwrap_err();
        assert!(err.contains("events[1]"), "{}", err);
    }

    #[test]
    fn test_load_collection_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, "{\"events\": [").unwrap();

        let err = load_collection(&path, EVENTS_KEY).unwrap_err();
        assert!(matches!(err, IcsGenError::Json { .. }), "{:?}", err);
    }

    #[test]
    fn test_save_events_uses_catalog_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let mut event = sample_event();
        event.ics_url = "https://example.org/a.ics".to_string();

        save_events(&path, &[event]).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let record = &written["events"][0];
        assert_eq!(record["locationURL"], "https://x.com");
        assert_eq!(record["icsURL"], "https://example.org/a.ics");
        assert_eq!(record.as_object().unwrap().len(), 9);
    }
}
