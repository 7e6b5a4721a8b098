//! ICS text generation.

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, EventLike};

use crate::catalog::Event;
use crate::config::IcsgenConfig;
use crate::duration::Duration;

const ICS_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// DESCRIPTION text: the location line followed by the event description.
pub fn event_description(event: &Event) -> String {
    format!(
        "Location: {} - {}\n{}",
        event.location, event.location_url, event.description
    )
}

/// Generate a single-event calendar for a validated catalog event.
///
/// `uid` identifies the event across regenerations; `now` becomes the
/// DTSTAMP and CREATED timestamps.
pub fn generate_ics(
    event: &Event,
    start: DateTime<Utc>,
    duration: &Duration,
    config: &IcsgenConfig,
    uid: &str,
    now: DateTime<Utc>,
) -> String {
    let mut cal = Calendar::new();

    let stamp = now.format(ICS_DATETIME_FORMAT).to_string();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(uid);
    ics_event.summary(&event.name);
    ics_event.add_property("DTSTAMP", &stamp);
    ics_event.add_property("CREATED", &stamp);
    ics_event.add_property("DTSTART", start.format(ICS_DATETIME_FORMAT).to_string());
    ics_event.add_property("DURATION", duration.to_string());
    ics_event.location(&event.location);
    ics_event.add_property("URL", &config.organization_url);
    ics_event.description(&event_description(event));
    ics_event.add_property("STATUS", "CONFIRMED");

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    strip_ics_bloat(&cal.to_string())
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with our own
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:-//icsgen//EN\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
