//! Command-line interface for checkprofile.

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::analyzer::CatalogFile;
use crate::config::{self, Config};
use crate::log::TracingLog;
use crate::problem::{Finding, Problem, Severity};
use crate::profile::ProblemProfile;
use crate::report::{self, CollectingReporter};
use crate::settings::FileStore;
use crate::suppress::SuppressionProfile;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Decide which static analysis findings get reported.
///
/// checkprofile keeps a profile of every problem the configured analyzer can
/// report, with your enabled/severity overrides, and filters analyzer
/// findings through it and through configured suppressions.
#[derive(Parser)]
#[command(name = "checkprofile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter a batch of findings through the profile and suppressions
    Report(ReportArgs),
    /// List problems or categories in the profile
    List(ListArgs),
    /// Change one problem's enabled flag or severity
    Set(SetArgs),
    /// Reset every problem to the analyzer defaults
    Reset,
}

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// JSON file containing the findings to filter
    pub findings: PathBuf,

    /// Output format: pretty or json (default: from config)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Show findings that were filtered out
    #[arg(long)]
    pub show_filtered: bool,
}

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Only list problems in this category
    #[arg(long)]
    pub category: Option<String>,

    /// List category names only
    #[arg(long, conflicts_with = "category")]
    pub categories: bool,
}

/// Arguments for the set command.
#[derive(Args)]
pub struct SetArgs {
    /// Problem id
    pub id: String,

    /// Report this problem
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    /// Never report this problem
    #[arg(long)]
    pub disable: bool,

    /// Severity to report the problem with
    #[arg(long)]
    pub severity: Option<Severity>,
}

/// A loaded config with its profile and settings store.
struct Session {
    config: Config,
    profile: ProblemProfile,
    store: FileStore,
}

fn open_session(config_path: Option<&Path>) -> anyhow::Result<Session> {
    let config_path = match config_path {
        Some(p) => p.to_path_buf(),
        None => config::discover()?,
    };

    let config = Config::parse_file(&config_path)
        .map_err(|e| anyhow::anyhow!("error parsing config {}: {}", config_path.display(), e))?;
    config::validate(&config).map_err(|e| anyhow::anyhow!("invalid config: {}", e))?;

    let store = FileStore::open(config.settings_path()?)?;
    let mut profile = ProblemProfile::new(
        Arc::new(TracingLog),
        &CatalogFile,
        Arc::new(CatalogFile),
        config.analyzer.clone(),
    )?;
    profile.load_overrides(&store);

    Ok(Session {
        config,
        profile,
        store,
    })
}

/// Split findings into those the profile reports and those it filters out,
/// both in input order.
pub fn partition_findings(
    profile: &ProblemProfile,
    findings: &mut [Finding],
    suppressions: &SuppressionProfile,
) -> (Vec<Finding>, Vec<Finding>) {
    let mut reporter = CollectingReporter::new();
    let mut filtered = Vec::new();

    for finding in findings.iter_mut() {
        let before = reporter.findings.len();
        if let Err(never) = profile.report_enabled_problems(
            std::slice::from_mut(finding),
            &mut reporter,
            suppressions,
        ) {
            match never {}
        }
        if reporter.findings.len() == before {
            filtered.push(finding.clone());
        }
    }

    (reporter.findings, filtered)
}

/// Run the report command.
pub fn run_report(config_path: Option<&Path>, args: &ReportArgs) -> anyhow::Result<i32> {
    let session = open_session(config_path)?;

    let format = args
        .format
        .as_deref()
        .unwrap_or_else(|| session.config.get_format());
    if format != "pretty" && format != "json" {
        eprintln!("Error: invalid format {:?}, must be 'pretty' or 'json'", format);
        return Ok(EXIT_ERROR);
    }

    let content = std::fs::read_to_string(&args.findings)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", args.findings.display(), e))?;
    let mut findings: Vec<Finding> = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("invalid findings file {}: {}", args.findings.display(), e))?;

    let suppressions = SuppressionProfile::new(session.config.suppressions.clone())?;
    let (reported, filtered) = partition_findings(&session.profile, &mut findings, &suppressions);

    let analyzer = session.profile.binary_path();
    match format {
        "json" => report::write_json(analyzer, findings.len(), &reported, &filtered)?,
        _ => report::write_pretty(
            analyzer,
            findings.len(),
            &reported,
            &filtered,
            args.show_filtered,
        ),
    }

    if reported.is_empty() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the list command.
pub fn run_list(config_path: Option<&Path>, args: &ListArgs) -> anyhow::Result<i32> {
    let session = open_session(config_path)?;
    let profile = &session.profile;

    if args.categories {
        for category in profile.categories() {
            let count = profile.problems_in_category(category).len();
            println!("  {:<20} {} problems", category.bold(), count);
        }
        return Ok(EXIT_SUCCESS);
    }

    let mut problems: Vec<&Problem> = match &args.category {
        Some(category) => profile.problems_in_category(category),
        None => profile.all_problems().collect(),
    };
    problems.sort_by(|a, b| a.id().cmp(b.id()));

    if problems.is_empty() {
        eprintln!("Warning: no problems to list");
        return Ok(EXIT_SUCCESS);
    }

    for problem in problems {
        let state = if problem.is_enabled() {
            "on ".green()
        } else {
            "off".dimmed()
        };
        println!(
            "  {} {:<28} {:<12} {:<11} {}",
            state,
            problem.id(),
            problem.category(),
            problem.severity().as_str(),
            problem.message().dimmed()
        );
    }

    Ok(EXIT_SUCCESS)
}

/// Run the set command.
pub fn run_set(config_path: Option<&Path>, args: &SetArgs) -> anyhow::Result<i32> {
    if !args.enable && !args.disable && args.severity.is_none() {
        eprintln!("Error: nothing to change, pass --enable, --disable or --severity");
        return Ok(EXIT_ERROR);
    }

    let mut session = open_session(config_path)?;

    let Some(problem) = session.profile.problem_mut(&args.id) else {
        eprintln!("Error: unknown problem {:?}", args.id);
        eprintln!("Run 'checkprofile list' to see available problems");
        return Ok(EXIT_ERROR);
    };

    if args.enable {
        problem.set_enabled(true);
    }
    if args.disable {
        problem.set_enabled(false);
    }
    if let Some(severity) = args.severity {
        problem.set_severity(severity);
    }
    let summary = format!(
        "{} is now {} with severity {}",
        problem.id(),
        if problem.is_enabled() { "enabled" } else { "disabled" },
        problem.severity()
    );

    session.profile.save_overrides(&mut session.store);
    session.store.save()?;

    println!("{}", summary);
    Ok(EXIT_SUCCESS)
}

/// Run the reset command.
pub fn run_reset(config_path: Option<&Path>) -> anyhow::Result<i32> {
    let mut session = open_session(config_path)?;

    session.profile.reset_all_to_defaults(&mut session.store);
    session.store.save()?;

    println!(
        "Reset {} problems to defaults ({})",
        session.profile.len(),
        session.store.path().display()
    );
    Ok(EXIT_SUCCESS)
}
