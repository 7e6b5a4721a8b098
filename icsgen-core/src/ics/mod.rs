//! Calendar artifact generation.
//!
//! `generate` builds the iCalendar text for one catalog event; `artifact`
//! names, stages and writes the resulting files.

mod artifact;
mod generate;

pub use artifact::{Artifact, artifact_url, file_name};
pub use generate::{event_description, generate_ics};
