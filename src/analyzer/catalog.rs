//! Catalog sources.
//!
//! [`CatalogFile`] reads a YAML manifest exported from the analyzer
//! (its version line plus the error list). [`StaticCatalog`] holds catalogs
//! in memory, keyed by analyzer path, for embedding hosts and tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

use super::{AnalyzerError, CatalogLoader, Version, VersionCheck};
use crate::problem::{Problem, Severity};

/// Top-level catalog manifest.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CatalogManifest {
    /// Version text as printed by the analyzer, e.g. "Cppcheck 2.13"
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub problems: Vec<CatalogEntry>,
}

/// One problem in the manifest.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub message: String,
    pub severity: String,
    /// Whether the problem is reported by default (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl CatalogEntry {
    fn to_problem(&self) -> Result<Problem, AnalyzerError> {
        let severity: Severity = self
            .severity
            .parse()
            .map_err(|e| AnalyzerError::Content(format!("problem {:?}: {}", self.id, e)))?;
        Ok(Problem::new(
            self.id.clone(),
            self.category.clone(),
            self.message.clone(),
            self.enabled,
            severity,
        ))
    }
}

impl CatalogManifest {
    /// Parse a manifest from YAML text.
    pub fn parse(content: &str) -> Result<Self, AnalyzerError> {
        serde_yaml::from_str(content).map_err(|e| AnalyzerError::Config(e.to_string()))
    }

    /// Version reported by the analyzer.
    pub fn version(&self) -> Result<Version, AnalyzerError> {
        if self.version.trim().is_empty() {
            return Err(AnalyzerError::Process(
                "analyzer did not report a version".to_string(),
            ));
        }
        Version::parse(&self.version)
    }

    /// All problems in manifest order. Duplicate ids are kept; the profile
    /// decides how to handle them.
    pub fn problems(&self) -> Result<Vec<Problem>, AnalyzerError> {
        self.problems.iter().map(CatalogEntry::to_problem).collect()
    }
}

/// Catalog read from a YAML manifest at the analyzer path.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogFile;

impl CatalogFile {
    fn read(binary_path: &str) -> Result<CatalogManifest, AnalyzerError> {
        let content = fs::read_to_string(binary_path)?;
        CatalogManifest::parse(&content)
    }
}

impl VersionCheck for CatalogFile {
    fn check_version(&self, binary_path: &str) -> Result<Version, AnalyzerError> {
        Self::read(binary_path)?.version()
    }
}

impl CatalogLoader for CatalogFile {
    fn load_catalog(&self, binary_path: &str) -> Result<Vec<Problem>, AnalyzerError> {
        Self::read(binary_path)?.problems()
    }
}

/// In-memory catalogs keyed by analyzer path.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    analyzers: HashMap<String, (Version, Vec<Problem>)>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the analyzer available at `binary_path`.
    pub fn with_analyzer(
        mut self,
        binary_path: impl Into<String>,
        version: Version,
        problems: Vec<Problem>,
    ) -> Self {
        self.analyzers.insert(binary_path.into(), (version, problems));
        self
    }

    fn analyzer(&self, binary_path: &str) -> Result<&(Version, Vec<Problem>), AnalyzerError> {
        self.analyzers
            .get(binary_path)
            .ok_or_else(|| AnalyzerError::Process(format!("no analyzer at {:?}", binary_path)))
    }
}

impl VersionCheck for StaticCatalog {
    fn check_version(&self, binary_path: &str) -> Result<Version, AnalyzerError> {
        self.analyzer(binary_path).map(|(version, _)| *version)
    }
}

impl CatalogLoader for StaticCatalog {
    fn load_catalog(&self, binary_path: &str) -> Result<Vec<Problem>, AnalyzerError> {
        self.analyzer(binary_path)
            .map(|(_, problems)| problems.iter().map(Problem::duplicate).collect())
    }
}
