//! Schema validation for catalog records.
//!
//! Each record kind has a fixed key set. A record is accepted only if its
//! keys equal that set exactly and every field has the expected type and,
//! where applicable, format. Fields are checked in declaration order and
//! the first failure is returned.

use std::collections::{BTreeSet, HashSet};

use serde_json::Value;

use crate::catalog::{Category, Event, RawRecord, Speaker};
use crate::date::PartialDate;
use crate::duration::is_duration_token;
use crate::error::{IcsGenError, IcsGenResult};

pub const SPEAKER_KEYS: &[&str] = &["id", "name", "description"];
pub const CATEGORY_KEYS: &[&str] = &["id", "name"];
pub const EVENT_KEYS: &[&str] = &[
    "name",
    "date",
    "duration",
    "location",
    "locationURL",
    "speakers",
    "category",
    "description",
    "icsURL",
];

/// Known speaker and category ids for one run.
///
/// Built once from the validated speaker and category collections and
/// passed by reference to event validation.
#[derive(Debug, Default, Clone)]
pub struct CatalogIndex {
    speaker_ids: HashSet<i64>,
    category_ids: HashSet<i64>,
}

impl CatalogIndex {
    /// Index the given collections. Duplicate ids are rejected.
    pub fn build(speakers: &[Speaker], categories: &[Category]) -> IcsGenResult<Self> {
        Ok(CatalogIndex {
            speaker_ids: unique_ids("speaker", speakers.iter().map(|s| s.id))?,
            category_ids: unique_ids("category", categories.iter().map(|c| c.id))?,
        })
    }

    pub fn has_speaker(&self, id: i64) -> bool {
        self.speaker_ids.contains(&id)
    }

    pub fn has_category(&self, id: i64) -> bool {
        self.category_ids.contains(&id)
    }
}

fn unique_ids(kind: &'static str, ids: impl Iterator<Item = i64>) -> IcsGenResult<HashSet<i64>> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(IcsGenError::DuplicateId { kind, id });
        }
    }
    Ok(seen)
}

/// Human-readable label for error messages, e.g. `speaker 3` or `event 'Talk'`.
fn record_label(kind: &str, record: &RawRecord, identity_key: &str) -> String {
    match record.get(identity_key) {
        Some(Value::String(s)) => format!("{} '{}'", kind, s),
        Some(Value::Number(n)) => format!("{} {}", kind, n),
        _ => kind.to_string(),
    }
}

fn check_keys(record: &RawRecord, expected: &[&str], label: &str) -> IcsGenResult<()> {
    let actual: BTreeSet<&str> = record.keys().map(String::as_str).collect();
    let expected: BTreeSet<&str> = expected.iter().copied().collect();

    if actual == expected {
        return Ok(());
    }

    let missing: Vec<_> = expected.difference(&actual).copied().collect();
    let unexpected: Vec<_> = actual.difference(&expected).copied().collect();

    let mut problems = Vec::new();
    if !missing.is_empty() {
        problems.push(format!("missing field(s) {}", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        problems.push(format!("unexpected field(s) {}", unexpected.join(", ")));
    }

    Err(IcsGenError::Schema {
        record: label.to_string(),
        message: problems.join("; "),
    })
}

fn type_error(label: &str, field: &str, value: &Value, expected: &str) -> IcsGenError {
    IcsGenError::Schema {
        record: label.to_string(),
        message: format!("{} {} is not {}", field, value, expected),
    }
}

// Keys are present once check_keys has passed.
fn field<'a>(record: &'a RawRecord, key: &str) -> &'a Value {
    record.get(key).unwrap_or(&Value::Null)
}

fn string_field(record: &RawRecord, key: &str, label: &str) -> IcsGenResult<String> {
    match field(record, key) {
        Value::String(s) => Ok(s.clone()),
        other => Err(type_error(label, key, other, "a string")),
    }
}

fn integer_field(record: &RawRecord, key: &str, label: &str) -> IcsGenResult<i64> {
    let value = field(record, key);
    value
        .as_i64()
        .ok_or_else(|| type_error(label, key, value, "an integer"))
}

/// Whether `url` is `http://` or `https://` followed by anything on one line.
pub fn is_location_url(url: &str) -> bool {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .is_some_and(|rest| !rest.contains('\n'))
}

pub fn validate_speaker(record: &RawRecord) -> IcsGenResult<Speaker> {
    let label = record_label("speaker", record, "id");
    check_keys(record, SPEAKER_KEYS, &label)?;

    Ok(Speaker {
        id: integer_field(record, "id", &label)?,
        name: string_field(record, "name", &label)?,
        description: string_field(record, "description", &label)?,
    })
}

pub fn validate_category(record: &RawRecord) -> IcsGenResult<Category> {
    let label = record_label("category", record, "id");
    check_keys(record, CATEGORY_KEYS, &label)?;

    Ok(Category {
        id: integer_field(record, "id", &label)?,
        name: string_field(record, "name", &label)?,
    })
}

pub fn validate_event(record: &RawRecord, index: &CatalogIndex) -> IcsGenResult<Event> {
    let label = record_label("event", record, "name");
    check_keys(record, EVENT_KEYS, &label)?;

    let format_error = |field: &'static str, value: &str, expected: &'static str| IcsGenError::Format {
        record: label.clone(),
        field,
        value: value.to_string(),
        expected,
    };

    let name = string_field(record, "name", &label)?;

    let date = string_field(record, "date", &label)?;
    if PartialDate::parse(&date).is_none() {
        return Err(format_error(
            "date",
            &date,
            "a partial ISO 8601 date (e.g. 2022-06-15T10:30)",
        ));
    }

    let duration = string_field(record, "duration", &label)?;
    if !is_duration_token(&duration) {
        return Err(format_error(
            "duration",
            &duration,
            "a duration token (e.g. 1d2h30m)",
        ));
    }

    let location = string_field(record, "location", &label)?;

    let location_url = string_field(record, "locationURL", &label)?;
    if !is_location_url(&location_url) {
        return Err(format_error("locationURL", &location_url, "an http(s) URL"));
    }

    let speakers = match field(record, "speakers") {
        Value::Array(items) => items
            .iter()
            .map(|item| -> IcsGenResult<i64> {
                let id = item
                    .as_i64()
                    .ok_or_else(|| type_error(&label, "speaker id", item, "an integer"))?;
                if !index.has_speaker(id) {
                    return Err(IcsGenError::Referential {
                        event: name.clone(),
                        kind: "speaker",
                        id,
                    });
                }
                Ok(id)
            })
            .collect::<IcsGenResult<Vec<_>>>()?,
        other => return Err(type_error(&label, "speakers", other, "a list")),
    };

    let category = integer_field(record, "category", &label)?;
    if !index.has_category(category) {
        return Err(IcsGenError::Referential {
            event: name,
            kind: "category",
            id: category,
        });
    }

    let description = string_field(record, "description", &label)?;
    let ics_url = string_field(record, "icsURL", &label)?;

    tracing::debug!(event = %name, "validated event");

    Ok(Event {
        name,
        date,
        duration,
        location,
        location_url,
        speakers,
        category,
        description,
        ics_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture is not an object"),
        }
    }

    fn event_record() -> Value {
        json!({
            "name": "Talk",
            "date": "2022-06-15T10:00",
            "duration": "1h",
            "location": "Room1",
            "locationURL": "https://x.com",
            "speakers": [1],
            "category": 1,
            "description": "desc",
            "icsURL": ""
        })
    }

    fn index() -> CatalogIndex {
        CatalogIndex::build(
            &[Speaker {
                id: 1,
                name: "A".to_string(),
                description: "d".to_string(),
            }],
            &[Category {
                id: 1,
                name: "Cat".to_string(),
            }],
        )
        .unwrap()
    }

    fn event_with(key: &str, value: Value) -> RawRecord {
        let mut event = record(event_record());
        event.insert(key.to_string(), value);
        event
    }

    #[test]
    fn test_valid_speaker_and_category() {
        let speaker = validate_speaker(&record(json!({"id": 1, "name": "A", "description": "d"})))
            .unwrap();
        assert_eq!(speaker.id, 1);
        assert_eq!(speaker.name, "A");

        let category = validate_category(&record(json!({"name": "Cat", "id": 7}))).unwrap();
        assert_eq!(category.id, 7);
    }

    #[test]
    fn test_speaker_key_set_is_exact() {
        let err = validate_speaker(&record(json!({"id": 3, "name": "A"}))).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, IcsGenError::Schema { .. }));
        assert!(message.contains("speaker 3"), "{}", message);
        assert!(message.contains("missing field(s) description"), "{}", message);

        let err = validate_category(&record(json!({"id": 3, "name": "A", "extra": true})))
            .unwrap_err();
        assert!(err.to_string().contains("unexpected field(s) extra"), "{}", err);
    }

    #[test]
    fn test_speaker_field_types() {
        let err = validate_speaker(&record(json!({"id": "1", "name": "A", "description": "d"})))
            .unwrap_err();
        assert!(err.to_string().contains("id \"1\" is not an integer"), "{}", err);

        let err = validate_speaker(&record(json!({"id": 1.5, "name": "A", "description": "d"})))
            .unwrap_err();
        assert!(matches!(err, IcsGenError::Schema { .. }));

        let err = validate_category(&record(json!({"id": 1, "name": null}))).unwrap_err();
        assert!(err.to_string().contains("name null is not a string"), "{}", err);
    }

    #[test]
    fn test_valid_event() {
        let event = validate_event(&record(event_record()), &index()).unwrap();
        assert_eq!(event.name, "Talk");
        assert_eq!(event.speakers, vec![1]);
        assert_eq!(event.location_url, "https://x.com");
        assert_eq!(event.ics_url, "");
    }

    #[test]
    fn test_event_with_extra_field_fails() {
        let err = validate_event(&event_with("extra", json!(1)), &index()).unwrap_err();
        assert!(matches!(err, IcsGenError::Schema { .. }), "{:?}", err);
    }

    #[test]
    fn test_event_date_format() {
        let err = validate_event(&event_with("date", json!("2022-13-01T10")), &index()).unwrap_err();
        assert!(
            matches!(err, IcsGenError::Format { field: "date", .. }),
            "{:?}",
            err
        );

        validate_event(&event_with("date", json!("2022-06-15T10:30")), &index()).unwrap();

        let err = validate_event(&event_with("date", json!(20220615)), &index()).unwrap_err();
        assert!(matches!(err, IcsGenError::Schema { .. }), "{:?}", err);
    }

    #[test]
    fn test_event_duration_and_url_format() {
        let err = validate_event(&event_with("duration", json!("1 hour")), &index()).unwrap_err();
        assert!(matches!(err, IcsGenError::Format { field: "duration", .. }));

        let err = validate_event(&event_with("locationURL", json!("x.com")), &index()).unwrap_err();
        assert!(matches!(err, IcsGenError::Format { field: "locationURL", .. }));

        validate_event(&event_with("locationURL", json!("http://www.x.com/a")), &index()).unwrap();
    }

    #[test]
    fn test_event_unknown_speaker() {
        let err = validate_event(&event_with("speakers", json!([1, 42])), &index()).unwrap_err();
        match err {
            IcsGenError::Referential { event, kind, id } => {
                assert_eq!(event, "Talk");
                assert_eq!(kind, "speaker");
                assert_eq!(id, 42);
            }
            other => panic!("expected referential error, got {:?}", other),
        }

        let err = validate_event(&event_with("speakers", json!(["1"])), &index()).unwrap_err();
        assert!(matches!(err, IcsGenError::Schema { .. }));

        let err = validate_event(&event_with("speakers", json!(1)), &index()).unwrap_err();
        assert!(err.to_string().contains("speakers 1 is not a list"), "{}", err);
    }

    #[test]
    fn test_event_unknown_category() {
        let err = validate_event(&event_with("category", json!(2)), &index()).unwrap_err();
        assert!(
            matches!(err, IcsGenError::Referential { kind: "category", id: 2, .. }),
            "{:?}",
            err
        );
    }

    #[test]
    fn test_first_failure_in_declaration_order() {
        let mut event = event_with("date", json!("bad"));
        event.insert("category".to_string(), json!(99));

        let err = validate_event(&event, &index()).unwrap_err();
        assert!(matches!(err, IcsGenError::Format { field: "date", .. }));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let speaker = Speaker {
            id: 1,
            name: "A".to_string(),
            description: "d".to_string(),
        };
        let err = CatalogIndex::build(&[speaker.clone(), speaker], &[]).unwrap_err();
        assert!(matches!(err, IcsGenError::DuplicateId { kind: "speaker", id: 1 }));
    }
}
