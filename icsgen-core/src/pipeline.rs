//! The batch run: load, index, validate, generate, persist.
//!
//! Every error is fatal. All events are validated and all artifacts are
//! rendered before the first file is written, so a failure anywhere in
//! the catalog leaves the output directory and the events file untouched.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::catalog::{
    CATEGORIES_KEY, Category, EVENTS_KEY, Event, SPEAKERS_KEY, Speaker, load_collection,
    save_events,
};
use crate::config::IcsgenConfig;
use crate::error::IcsGenResult;
use crate::ics::Artifact;
use crate::schema::{CatalogIndex, validate_category, validate_event, validate_speaker};

/// Locations of the three catalog files.
#[derive(Debug, Clone)]
pub struct CatalogPaths {
    pub events: PathBuf,
    pub speakers: PathBuf,
    pub categories: PathBuf,
}

impl Default for CatalogPaths {
    fn default() -> Self {
        CatalogPaths {
            events: PathBuf::from("events.json"),
            speakers: PathBuf::from("speaker-index.json"),
            categories: PathBuf::from("categories.json"),
        }
    }
}

/// A fully validated catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub speakers: Vec<Speaker>,
    pub categories: Vec<Category>,
    pub events: Vec<Event>,
}

impl Catalog {
    /// Load all three files, then validate speakers and categories, index
    /// them, and validate every event against the index.
    pub fn load(paths: &CatalogPaths) -> IcsGenResult<Self> {
        let raw_events = load_collection(&paths.events, EVENTS_KEY)?;
        let raw_speakers = load_collection(&paths.speakers, SPEAKERS_KEY)?;
        let raw_categories = load_collection(&paths.categories, CATEGORIES_KEY)?;

        let speakers = raw_speakers
            .iter()
            .map(validate_speaker)
            .collect::<IcsGenResult<Vec<_>>>()?;
        let categories = raw_categories
            .iter()
            .map(validate_category)
            .collect::<IcsGenResult<Vec<_>>>()?;

        let index = CatalogIndex::build(&speakers, &categories)?;

        let events = raw_events
            .iter()
            .map(|record| validate_event(record, &index))
            .collect::<IcsGenResult<Vec<_>>>()?;

        tracing::info!(
            events = events.len(),
            speakers = speakers.len(),
            categories = categories.len(),
            "catalog is valid"
        );

        Ok(Catalog {
            speakers,
            categories,
            events,
        })
    }
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct RunSummary {
    /// Written artifact paths, in catalog order
    pub artifacts: Vec<PathBuf>,
}

/// Validate the catalog, write one artifact per event and rewrite the
/// events file with every `icsURL` filled in.
pub fn run(paths: &CatalogPaths, config: &IcsgenConfig, now: DateTime<Utc>) -> IcsGenResult<RunSummary> {
    let mut catalog = Catalog::load(paths)?;

    let staged = catalog
        .events
        .iter()
        .map(|event| Artifact::for_event(event, config, now))
        .collect::<IcsGenResult<Vec<_>>>()?;

    let mut written = HashSet::new();
    for (event, artifact) in catalog.events.iter_mut().zip(&staged) {
        if !written.insert(artifact.path.as_path()) {
            tracing::warn!(
                path = %artifact.path.display(),
                event = %event.name,
                "artifact path repeats an earlier event; overwriting"
            );
        }
        artifact.publish(event)?;
    }

    save_events(&paths.events, &catalog.events)?;

    Ok(RunSummary {
        artifacts: staged.into_iter().map(|a| a.path).collect(),
    })
}
