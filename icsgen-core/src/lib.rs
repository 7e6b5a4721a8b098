//! Core of icsgen: event catalog validation and iCalendar generation.
//!
//! - `schema` validates speaker, category and event records
//! - `duration` and `date` parse the compact duration and partial date grammars
//! - `ics` renders and writes one calendar file per event
//! - `pipeline` ties them together into a fail-fast batch run

pub mod catalog;
pub mod config;
pub mod date;
pub mod duration;
pub mod error;
pub mod ics;
pub mod pipeline;
pub mod schema;
pub mod utils;

pub use catalog::{Category, Event, Speaker};
pub use error::{IcsGenError, IcsGenResult};
