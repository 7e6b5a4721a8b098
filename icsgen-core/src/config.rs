//! Generator configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{IcsGenError, IcsGenResult};

/// Config file read from the working directory when no path is given.
pub static DEFAULT_CONFIG_FILE: &str = "icsgen.toml";

static DEFAULT_OUTPUT_DIR: &str = "ics";
static DEFAULT_URL_BASE: &str = "https://raw.githubusercontent.com/example/events/main/";
static DEFAULT_ORGANIZATION_URL: &str = "https://example.org";
static DEFAULT_FILE_PREFIX: &str = "event";

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_url_base() -> String {
    DEFAULT_URL_BASE.to_string()
}

fn default_organization_url() -> String {
    DEFAULT_ORGANIZATION_URL.to_string()
}

fn default_file_prefix() -> String {
    DEFAULT_FILE_PREFIX.to_string()
}

/// Settings for artifact generation.
///
/// Values come from an optional TOML file, overridden by `ICSGEN_*`
/// environment variables (e.g. `ICSGEN_OUTPUT_DIR`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcsgenConfig {
    /// Directory the .ics files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Prefix of every generated `icsURL`; the artifact path is appended to it
    #[serde(default = "default_url_base")]
    pub url_base: String,

    /// URL attached to every calendar event
    #[serde(default = "default_organization_url")]
    pub organization_url: String,

    /// First component of every artifact file name
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for IcsgenConfig {
    fn default() -> Self {
        IcsgenConfig {
            output_dir: default_output_dir(),
            url_base: default_url_base(),
            organization_url: default_organization_url(),
            file_prefix: default_file_prefix(),
        }
    }
}

impl IcsgenConfig {
    /// Load configuration. An explicit `path` must exist; without one,
    /// `icsgen.toml` is used if present.
    pub fn load(path: Option<&Path>) -> IcsGenResult<Self> {
        let file = match path {
            Some(path) => File::from(path.to_path_buf()).required(true),
            None => File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("ICSGEN"))
            .build()
            .map_err(|e| IcsGenError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| IcsGenError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icsgen.toml");
        std::fs::write(&path, "file_prefix = \"conf\"\noutput_dir = \"out/ics\"\n").unwrap();

        let config = IcsgenConfig::load(Some(&path)).unwrap();

        assert_eq!(config.file_prefix, "conf");
        assert_eq!(config.output_dir, PathBuf::from("out/ics"));
        assert_eq!(config.url_base, DEFAULT_URL_BASE);
        assert_eq!(config.organization_url, DEFAULT_ORGANIZATION_URL);
    }

    #[test]
    fn test_load_requires_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = IcsgenConfig::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, IcsGenError::Config(_)), "{:?}", err);
    }
}
