//! Analyzer collaborators: version checking and catalog loading.
//!
//! The profile never talks to the analyzer binary directly. It asks a
//! [`VersionCheck`] whether the configured analyzer is supported and a
//! [`CatalogLoader`] for the problems that analyzer can report.

mod catalog;

pub use catalog::{CatalogEntry, CatalogFile, CatalogManifest, StaticCatalog};

use regex::Regex;
use thiserror::Error;

use crate::problem::Problem;

/// Errors that can occur while querying the analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("analyzer version {0} is not supported (minimum is {min})", min = Version::MINIMUM)]
    IncompatibleVersion(Version),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid analyzer configuration: {0}")]
    Config(String),
    #[error("invalid analyzer output: {0}")]
    Content(String),
    #[error("analyzer execution failed: {0}")]
    Process(String),
}

/// Analyzer version as `major.minor.patch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

lazy_static::lazy_static! {
    static ref VERSION_PATTERN: Regex =
        Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").unwrap();
}

impl Version {
    /// Oldest analyzer whose catalog format is understood.
    pub const MINIMUM: Version = Version::new(1, 44, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse version text such as `Cppcheck 1.44` or `2.13.0`.
    pub fn parse(text: &str) -> Result<Self, AnalyzerError> {
        let caps = VERSION_PATTERN
            .captures(text)
            .ok_or_else(|| AnalyzerError::Content(format!("no version in {:?}", text)))?;

        let number = |i: usize| -> Result<u32, AnalyzerError> {
            match caps.get(i) {
                Some(m) => m
                    .as_str()
                    .parse()
                    .map_err(|_| AnalyzerError::Content(format!("bad version number in {:?}", text))),
                None => Ok(0),
            }
        };

        Ok(Self::new(number(1)?, number(2)?, number(3)?))
    }

    pub fn is_compatible(&self) -> bool {
        *self >= Self::MINIMUM
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Reports the version of the analyzer at a path.
pub trait VersionCheck: Send + Sync {
    fn check_version(&self, binary_path: &str) -> Result<Version, AnalyzerError>;
}

/// Enumerates every problem the analyzer at a path can report.
pub trait CatalogLoader: Send + Sync {
    fn load_catalog(&self, binary_path: &str) -> Result<Vec<Problem>, AnalyzerError>;
}
