//! Optional YAML configuration.
//!
//! ```yaml
//! output_dir: ./output
//! agencies:
//!   - slug: chi_ssa_1
//!     name: "Chicago Special Service Area #1-2015"
//!     timezone: America/Chicago
//!   - slug: det_city_council
//!     name: Detroit City Council
//!     timezone: America/Detroit
//! ```
//!
//! Command-line flags override anything read from here.

use crate::models::Agency;
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Where `process` writes output when no directory is given.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Known agencies, looked up by slug.
    #[serde(default)]
    pub agencies: Vec<Agency>,
}

/// Errors from loading the YAML config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    pub fn agency(&self, slug: &str) -> Option<&Agency> {
        self.agencies.iter().find(|agency| agency.slug == slug)
    }

    /// The configured agency for `slug`, or a bare one in `timezone`.
    ///
    /// An explicit `timezone` always wins over the configured one.
    pub fn resolve_agency(&self, slug: &str, timezone: Option<Tz>) -> Agency {
        let mut agency = self
            .agency(slug)
            .cloned()
            .unwrap_or_else(|| Agency::new(slug, "", chrono_tz::America::Chicago));
        if let Some(tz) = timezone {
            agency.timezone = tz;
        }
        agency
    }
}

/// Parse an IANA timezone name such as `America/Detroit`.
pub fn parse_timezone(name: &str) -> Result<Tz, String> {
    name.parse::<Tz>()
        .map_err(|_| format!("unknown timezone: {name}"))
}
