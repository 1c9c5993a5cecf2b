//! Suppression of findings by file, problem id, and line.
//!
//! A suppression names a file glob and optionally a problem id and a line:
//! - file only: every finding in matching files
//! - file + problem: that problem anywhere in matching files
//! - file + problem + line: that problem on that line only

use globset::{Glob, GlobMatcher};
use serde::{Deserialize, Serialize};

/// Answers whether a finding must not be reported.
pub trait SuppressionOracle {
    fn is_suppressed(&self, file: &str, id: &str, line: usize) -> bool;
}

/// A suppression entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suppression {
    /// File path or glob pattern
    pub file: String,
    /// Problem id to suppress (all problems when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
    /// Line to suppress on (whole file when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Human-readable reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Suppression {
    pub fn file(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            problem: None,
            line: None,
            reason: None,
        }
    }

    pub fn problem(file: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            problem: Some(id.into()),
            ..Self::file(file)
        }
    }

    pub fn line(file: impl Into<String>, id: impl Into<String>, line: usize) -> Self {
        Self {
            line: Some(line),
            ..Self::problem(file, id)
        }
    }
}

struct CompiledSuppression {
    matcher: GlobMatcher,
    suppression: Suppression,
}

impl CompiledSuppression {
    fn matches(&self, file: &str, id: &str, line: usize) -> bool {
        if self.suppression.file != file && !self.matcher.is_match(file) {
            return false;
        }

        match (&self.suppression.problem, self.suppression.line) {
            (None, _) => true,
            (Some(problem), None) => problem == id,
            (Some(problem), Some(l)) => problem == id && l == line,
        }
    }
}

/// Suppression oracle built from a list of entries.
#[derive(Default)]
pub struct SuppressionProfile {
    entries: Vec<CompiledSuppression>,
}

impl SuppressionProfile {
    /// Compile the entries. Fails on an invalid glob or on a line without a
    /// problem id.
    pub fn new(suppressions: Vec<Suppression>) -> anyhow::Result<Self> {
        let mut entries = Vec::with_capacity(suppressions.len());
        for suppression in suppressions {
            if suppression.line.is_some() && suppression.problem.is_none() {
                anyhow::bail!(
                    "suppression for {:?} has a line but no problem id",
                    suppression.file
                );
            }
            let matcher = Glob::new(&suppression.file)
                .map_err(|e| {
                    anyhow::anyhow!("invalid suppression pattern {:?}: {}", suppression.file, e)
                })?
                .compile_matcher();
            entries.push(CompiledSuppression {
                matcher,
                suppression,
            });
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first entry that suppresses the given finding location.
    pub fn matching(&self, file: &str, id: &str, line: usize) -> Option<&Suppression> {
        self.entries
            .iter()
            .find(|e| e.matches(file, id, line))
            .map(|e| &e.suppression)
    }
}

impl SuppressionOracle for SuppressionProfile {
    fn is_suppressed(&self, file: &str, id: &str, line: usize) -> bool {
        self.matching(file, id, line).is_some()
    }
}
