//! checkprofile - problem profile engine for static analysis findings.
//!
//! For each finding an external analyzer produces, checkprofile decides
//! whether it is reported and at what severity. It reconciles three
//! sources: the analyzer's catalog of problem ids, the user's persisted
//! per-problem overrides, and line-level suppressions.
//!
//! # Architecture
//!
//! - `problem`: Problem definitions and findings
//! - `analyzer`: Version check and catalog loading collaborators
//! - `profile`: The problem registry, override persistence, and filtering
//! - `settings`: Key-value stores for persisted overrides
//! - `suppress`: Suppression oracle
//! - `report`: Reporters and output formatting (text, JSON)
//! - `log`: Log sink and tracing setup
//! - `config`: YAML config schema

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod log;
pub mod problem;
pub mod profile;
pub mod report;
pub mod settings;
pub mod suppress;

pub use analyzer::{AnalyzerError, CatalogFile, CatalogLoader, StaticCatalog, Version, VersionCheck};
pub use config::Config;
pub use log::{LogSink, TracingLog};
pub use problem::{Finding, Problem, Severity};
pub use profile::ProblemProfile;
pub use report::{CollectingReporter, ProblemReporter};
pub use settings::{FileStore, MemoryStore, SettingsStore};
pub use suppress::{Suppression, SuppressionOracle, SuppressionProfile};
