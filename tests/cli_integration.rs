//! Integration tests for the CLI commands.
//!
//! Each test writes a config into a temp directory that points at the
//! catalog fixture and keeps its settings file next to it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use checkprofile::analyzer::CatalogFile;
use checkprofile::cli::{self, ReportArgs, SetArgs, EXIT_ERROR, EXIT_FAILED, EXIT_SUCCESS};
use checkprofile::config::Config;
use checkprofile::log::TracingLog;
use checkprofile::problem::{Finding, Severity};
use checkprofile::profile::{ProblemProfile, PROBLEMS_KEY};
use checkprofile::settings::{FileStore, SettingsStore, UNSET};
use checkprofile::suppress::SuppressionProfile;
use tempfile::TempDir;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

/// Write a config using the fixture catalog and suppressions.
fn write_config(dir: &Path) -> PathBuf {
    let catalog = testdata_path().join("catalog.yaml");
    let config = format!(
        r#"analyzer: {:?}
settings: settings.json
suppressions:
  - file: "src/generated/**"
  - file: src/util.c
    problem: memleak
    line: 42
"#,
        catalog.to_string_lossy()
    );
    let path = dir.join("checkprofile.yaml");
    fs::write(&path, config).unwrap();
    path
}

fn write_findings(dir: &Path, findings: &[Finding]) -> PathBuf {
    let path = dir.join("findings.json");
    fs::write(&path, serde_json::to_string(findings).unwrap()).unwrap();
    path
}

fn report_args(findings: PathBuf, format: Option<&str>) -> ReportArgs {
    ReportArgs {
        findings,
        format: format.map(str::to_string),
        show_filtered: true,
    }
}

fn set_args(id: &str) -> SetArgs {
    SetArgs {
        id: id.to_string(),
        enable: false,
        disable: false,
        severity: None,
    }
}

fn stored_overrides(dir: &Path) -> String {
    FileStore::open(dir.join("settings.json"))
        .unwrap()
        .get_string(PROBLEMS_KEY)
}

#[test]
fn test_report_exits_failed_when_findings_reported() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    let args = report_args(testdata_path().join("findings.json"), Some("json"));

    let code = cli::run_report(Some(&config), &args).unwrap();
    assert_eq!(code, EXIT_FAILED);
}

#[test]
fn test_report_exits_success_when_everything_filtered() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    let findings = write_findings(
        temp.path(),
        &[
            Finding::new("unusedVariable", "Unused variable: tmp", Severity::Style, "src/main.c", 20),
            Finding::new("memleak", "Memory leak: buf", Severity::Error, "src/util.c", 42),
        ],
    );

    let code = cli::run_report(Some(&config), &report_args(findings, None)).unwrap();
    assert_eq!(code, EXIT_SUCCESS);
}

#[test]
fn test_report_invalid_format_is_error_exit() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    let args = report_args(testdata_path().join("findings.json"), Some("sarif"));

    let code = cli::run_report(Some(&config), &args).unwrap();
    assert_eq!(code, EXIT_ERROR);
}

#[test]
fn test_report_missing_findings_file_is_error() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    let args = report_args(temp.path().join("missing.json"), None);

    assert!(cli::run_report(Some(&config), &args).is_err());
}

#[test]
fn test_partition_keeps_input_order() {
    let temp = TempDir::new().unwrap();
    let config = Config::parse_file(write_config(temp.path())).unwrap();
    let profile = ProblemProfile::new(
        Arc::new(TracingLog),
        &CatalogFile,
        Arc::new(CatalogFile),
        config.analyzer.clone(),
    )
    .unwrap();
    let suppressions = SuppressionProfile::new(config.suppressions.clone()).unwrap();

    let content = fs::read_to_string(testdata_path().join("findings.json")).unwrap();
    let mut findings: Vec<Finding> = serde_json::from_str(&content).unwrap();

    let (reported, filtered) = cli::partition_findings(&profile, &mut findings, &suppressions);

    let reported: Vec<_> = reported.iter().map(|f| f.id.as_str()).collect();
    let filtered: Vec<_> = filtered.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(reported, vec!["nullPointer", "shadowVariable"]);
    assert_eq!(filtered, vec!["unusedVariable", "memleak", "uninitvar"]);
}

#[test]
fn test_set_unknown_id_is_error_exit() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());
    let mut args = set_args("noSuchCheck");
    args.disable = true;

    let code = cli::run_set(Some(&config), &args).unwrap();
    assert_eq!(code, EXIT_ERROR);
    assert_eq!(stored_overrides(temp.path()), UNSET);
}

#[test]
fn test_set_without_changes_is_error_exit() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    let code = cli::run_set(Some(&config), &set_args("memleak")).unwrap();
    assert_eq!(code, EXIT_ERROR);
}

#[test]
fn test_set_persists_override() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    let mut args = set_args("memleak");
    args.disable = true;
    assert_eq!(cli::run_set(Some(&config), &args).unwrap(), EXIT_SUCCESS);

    let mut args = set_args("nullPointer");
    args.severity = Some(Severity::Warning);
    assert_eq!(cli::run_set(Some(&config), &args).unwrap(), EXIT_SUCCESS);

    let stored = stored_overrides(temp.path());
    assert!(stored.contains("memleak=false;error!"), "{}", stored);
    assert!(stored.contains("nullPointer=true;warning!"), "{}", stored);
}

#[test]
fn test_reset_clears_stored_overrides() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path());

    let mut args = set_args("memleak");
    args.disable = true;
    cli::run_set(Some(&config), &args).unwrap();
    assert_ne!(stored_overrides(temp.path()), UNSET);

    assert_eq!(cli::run_reset(Some(&config)).unwrap(), EXIT_SUCCESS);
    assert_eq!(stored_overrides(temp.path()), UNSET);
}
