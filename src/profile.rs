//! The problem profile: every problem the configured analyzer can report,
//! with the user's persisted overrides applied.
//!
//! Overrides are stored as one string value of repeated
//! `<id>=<enabled>;<severity>!` groups. Ids that the current catalog does not
//! know are skipped on load, so a settings value survives analyzer upgrades.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;

use crate::analyzer::{AnalyzerError, CatalogLoader, VersionCheck};
use crate::log::LogSink;
use crate::problem::{Finding, Problem};
use crate::report::ProblemReporter;
use crate::settings::{SettingsStore, UNSET};
use crate::suppress::SuppressionOracle;

/// Terminates each problem group in the persisted value.
pub const PROBLEM_DELIMITER: char = '!';
/// Separates a problem id from its encoded state.
pub const ID_DELIMITER: char = '=';
/// Settings key holding the persisted overrides.
pub const PROBLEMS_KEY: &str = "problems";

/// A persisted overrides value that could not be parsed.
#[derive(Error, Debug)]
pub enum OverrideError {
    #[error("entry {0:?} has no '=' separator")]
    MissingSeparator(String),
}

/// Registry of problems keyed by id.
pub struct ProblemProfile {
    problems: HashMap<String, Problem>,
    binary_path: String,
    loader: Arc<dyn CatalogLoader>,
    log: Arc<dyn LogSink>,
}

impl ProblemProfile {
    /// Build the profile for the analyzer at `binary_path`.
    ///
    /// Fails with [`AnalyzerError::IncompatibleVersion`] before loading any
    /// catalog when the analyzer is too old. Nothing is returned unless the
    /// whole catalog loaded.
    pub fn new(
        log: Arc<dyn LogSink>,
        version_check: &dyn VersionCheck,
        loader: Arc<dyn CatalogLoader>,
        binary_path: impl Into<String>,
    ) -> Result<Self, AnalyzerError> {
        let binary_path = binary_path.into();

        let version = version_check.check_version(&binary_path)?;
        if !version.is_compatible() {
            return Err(AnalyzerError::IncompatibleVersion(version));
        }
        tracing::debug!(analyzer = %binary_path, %version, "analyzer version accepted");

        let problems = build_registry(loader.as_ref(), log.as_ref(), &binary_path)?;

        Ok(Self {
            problems,
            binary_path,
            loader,
            log,
        })
    }

    /// Reload the catalog after the analyzer path changed.
    ///
    /// Errors go to the log sink. On failure the previous registry and path
    /// stay in place.
    pub fn on_analyzer_path_changed(&mut self, new_path: &str) {
        match build_registry(self.loader.as_ref(), self.log.as_ref(), new_path) {
            Ok(problems) => {
                self.problems = problems;
                self.binary_path = new_path.to_string();
            }
            Err(e) => self.log.log_error("Error reloading the problems", &e),
        }
    }

    pub fn binary_path(&self) -> &str {
        &self.binary_path
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Apply the overrides persisted in `store`.
    ///
    /// A corrupt value is reported to the user; overrides applied before the
    /// corrupt entry are kept.
    pub fn load_overrides(&mut self, store: &dyn SettingsStore) {
        let settings = store.get_string(PROBLEMS_KEY);
        if settings == UNSET {
            return;
        }

        if let Err(e) = self.apply_overrides(&settings) {
            self.log
                .show_user_error("Invalid problem profile preferences found", &e);
        }
    }

    /// Apply an overrides value, returning how many problems it changed.
    pub fn apply_overrides(&mut self, settings: &str) -> Result<usize, OverrideError> {
        let mut applied = 0;

        for group in settings.split(PROBLEM_DELIMITER).filter(|g| !g.is_empty()) {
            let (id, encoded) = match group.split_once(ID_DELIMITER) {
                Some((id, encoded)) => (id, Some(encoded)),
                None => (group, None),
            };

            // Stale ids from another analyzer version are expected.
            let Some(problem) = self.problems.get_mut(id) else {
                continue;
            };
            let encoded =
                encoded.ok_or_else(|| OverrideError::MissingSeparator(group.to_string()))?;

            if problem.deserialize_mutable_state(encoded) {
                applied += 1;
            } else {
                self.log
                    .log_warning(&format!("Ignoring malformed override for {}: {:?}", id, encoded));
            }
        }

        tracing::debug!(applied, "applied problem overrides");
        Ok(applied)
    }

    /// Encode every problem's state as the persisted overrides value.
    ///
    /// Groups are sorted by id so the value is stable across runs.
    pub fn serialize_overrides(&self) -> String {
        let mut ids: Vec<&String> = self.problems.keys().collect();
        ids.sort();

        let mut settings = String::new();
        for id in ids {
            let problem = &self.problems[id];
            settings.push_str(problem.id());
            settings.push(ID_DELIMITER);
            settings.push_str(&problem.serialize_mutable_state());
            settings.push(PROBLEM_DELIMITER);
        }
        settings
    }

    pub fn save_overrides(&self, store: &mut dyn SettingsStore) {
        store.set_string(PROBLEMS_KEY, &self.serialize_overrides());
    }

    /// Reset the stored value and every problem to its catalog default.
    pub fn reset_all_to_defaults(&mut self, store: &mut dyn SettingsStore) {
        store.reset_to_default(PROBLEMS_KEY);
        for problem in self.problems.values_mut() {
            problem.reset_to_default();
        }
    }

    /// Deep copy; collaborators are shared, problems are not.
    pub fn duplicate(&self) -> Self {
        Self {
            problems: self
                .problems
                .iter()
                .map(|(id, problem)| (id.clone(), problem.duplicate()))
                .collect(),
            binary_path: self.binary_path.clone(),
            loader: Arc::clone(&self.loader),
            log: Arc::clone(&self.log),
        }
    }

    /// Distinct categories across all problems.
    pub fn categories(&self) -> BTreeSet<&str> {
        self.problems.values().map(Problem::category).collect()
    }

    pub fn problems_in_category(&self, category: &str) -> Vec<&Problem> {
        self.problems
            .values()
            .filter(|p| p.category() == category)
            .collect()
    }

    pub fn all_problems(&self) -> impl Iterator<Item = &Problem> {
        self.problems.values()
    }

    pub fn problem(&self, id: &str) -> Option<&Problem> {
        self.problems.get(id)
    }

    pub fn problem_mut(&mut self, id: &str) -> Option<&mut Problem> {
        self.problems.get_mut(id)
    }

    /// Whether a finding should be reported according to the profile.
    ///
    /// Unknown ids are enabled. For an enabled known id the finding's
    /// severity is replaced by the profile's.
    pub fn is_problem_enabled(&self, finding: &mut Finding) -> bool {
        match self.problems.get(&finding.id) {
            Some(problem) => {
                let enabled = problem.is_enabled();
                if enabled {
                    finding.severity = problem.severity();
                }
                enabled
            }
            None => true,
        }
    }

    /// Pass every enabled, unsuppressed finding to `reporter` in input order.
    ///
    /// The enablement check runs first, so its severity rewrite lands on
    /// the finding even when the finding is then suppressed.
    pub fn report_enabled_problems<R: ProblemReporter>(
        &self,
        findings: &mut [Finding],
        reporter: &mut R,
        suppressions: &dyn SuppressionOracle,
    ) -> Result<(), R::Error> {
        for finding in findings.iter_mut() {
            if self.is_problem_enabled(finding)
                && !suppressions.is_suppressed(&finding.file, &finding.id, finding.line)
            {
                reporter.report(finding)?;
            }
        }
        Ok(())
    }

    pub fn message_for_id(&self, id: &str) -> Option<&str> {
        self.problems.get(id).map(Problem::message)
    }
}

/// Load the catalog at `binary_path` into a fresh registry.
fn build_registry(
    loader: &dyn CatalogLoader,
    log: &dyn LogSink,
    binary_path: &str,
) -> Result<HashMap<String, Problem>, AnalyzerError> {
    let catalog = loader.load_catalog(binary_path)?;
    let mut problems = HashMap::with_capacity(catalog.len());

    for problem in catalog {
        let id = problem.id().to_string();
        if problems.insert(id.clone(), problem).is_some() {
            log.log_warning(&format!("Found duplicate id: {}", id));
        }
    }

    tracing::debug!(analyzer = %binary_path, problems = problems.len(), "loaded problem catalog");
    Ok(problems)
}
