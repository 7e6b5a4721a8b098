//! Artifact naming, staging and writing.

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::catalog::Event;
use crate::config::IcsgenConfig;
use crate::date::PartialDate;
use crate::duration::Duration;
use crate::error::{IcsGenError, IcsGenResult};
use crate::ics::generate_ics;
use crate::utils::{sanitize_file_stem, write_atomic};

/// A rendered calendar file that has not necessarily been written yet.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Destination of the .ics file (output directory + file name)
    pub path: PathBuf,
    /// Public URL the catalog's `icsURL` is set to
    pub url: String,
    pub content: String,
}

/// `<prefix>-<sanitized name>-<DD>-<Mon>-<YYYY>.ics`, dated with the day
/// as written in the catalog.
pub fn file_name(prefix: &str, event_name: &str, day: NaiveDate) -> String {
    format!(
        "{}-{}-{}.ics",
        prefix,
        sanitize_file_stem(event_name),
        day.format("%d-%b-%Y")
    )
}

/// Append the artifact path to the URL base, using `/` separators.
///
/// Only the normal components of `path` are kept, so `./ics/a.ics` and
/// `ics/a.ics` map to the same URL.
pub fn artifact_url(url_base: &str, path: &Path) -> String {
    let relative = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    format!("{}/{}", url_base.trim_end_matches('/'), relative)
}

impl Artifact {
    /// Render the artifact for a validated event without touching the
    /// filesystem.
    pub fn render(
        event: &Event,
        duration: &Duration,
        config: &IcsgenConfig,
        now: DateTime<Utc>,
    ) -> IcsGenResult<Self> {
        let date = PartialDate::parse(&event.date).ok_or_else(|| {
            IcsGenError::Date(format!(
                "'{}' of event '{}' is not a partial ISO 8601 date",
                event.date, event.name
            ))
        })?;
        let start = date.start_instant(now.year())?;
        let day = date.local_date(now.year())?;

        let name = file_name(&config.file_prefix, &event.name, day);
        let path = config.output_dir.join(&name);
        let url = artifact_url(&config.url_base, &path);

        let uid = format!("{}@icsgen", name.trim_end_matches(".ics"));
        let content = generate_ics(event, start, duration, config, &uid, now);

        Ok(Artifact { path, url, content })
    }

    /// Parse the event's duration and render its artifact.
    pub fn for_event(event: &Event, config: &IcsgenConfig, now: DateTime<Utc>) -> IcsGenResult<Self> {
        let duration = Duration::parse(&event.duration)?;
        Self::render(event, &duration, config, now)
    }

    /// Write the artifact, replacing any existing file at its path.
    pub fn write(&self) -> IcsGenResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_atomic(&self.path, self.content.as_bytes())?;
        tracing::info!(path = %self.path.display(), "wrote artifact");
        Ok(())
    }

    /// Write the artifact and point the event's `icsURL` at it.
    pub fn publish(&self, event: &mut Event) -> IcsGenResult<()> {
        self.write()?;
        event.ics_url = self.url.clone();
        Ok(())
    }
}
