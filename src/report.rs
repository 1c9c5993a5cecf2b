//! Reporters for accepted findings and output formatting.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption

use colored::*;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::problem::{Finding, Severity};

/// Receives each finding that survives profile filtering.
pub trait ProblemReporter {
    type Error;

    fn report(&mut self, finding: &Finding) -> Result<(), Self::Error>;
}

/// Reporter that keeps accepted findings in order.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    pub findings: Vec<Finding>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProblemReporter for CollectingReporter {
    type Error = Infallible;

    fn report(&mut self, finding: &Finding) -> Result<(), Self::Error> {
        self.findings.push(finding.clone());
        Ok(())
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report structure.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub analyzer: String,
    pub findings_received: usize,
    pub findings_reported: usize,
    pub findings: Vec<JsonFinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filtered: Vec<JsonFinding>,
}

/// JSON finding structure.
#[derive(Serialize, Deserialize)]
pub struct JsonFinding {
    pub id: String,
    pub severity: String,
    pub file: String,
    pub line: usize,
    pub message: String,
}

fn finding_to_json(f: &Finding) -> JsonFinding {
    JsonFinding {
        id: f.id.clone(),
        severity: f.severity.to_string(),
        file: f.file.clone(),
        line: f.line,
        message: f.message.clone(),
    }
}

/// Build the JSON report for a filtering run.
pub fn json_report(
    analyzer: &str,
    received: usize,
    reported: &[Finding],
    filtered: &[Finding],
) -> JsonReport {
    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        analyzer: analyzer.to_string(),
        findings_received: received,
        findings_reported: reported.len(),
        findings: reported.iter().map(finding_to_json).collect(),
        filtered: filtered.iter().map(finding_to_json).collect(),
    }
}

/// Write results in JSON format.
pub fn write_json(
    analyzer: &str,
    received: usize,
    reported: &[Finding],
    filtered: &[Finding],
) -> anyhow::Result<()> {
    let report = json_report(analyzer, received, reported, filtered);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

fn severity_label(severity: Severity) -> ColoredString {
    let text = format!("{:<11}", severity.as_str());
    match severity {
        Severity::Error => text.red().bold(),
        Severity::Warning => text.yellow().bold(),
        Severity::Performance | Severity::Portability => text.magenta(),
        Severity::Style => text.cyan(),
        Severity::Information => text.dimmed(),
    }
}

/// Write results in colored terminal format.
pub fn write_pretty(
    analyzer: &str,
    received: usize,
    reported: &[Finding],
    filtered: &[Finding],
    show_filtered: bool,
) {
    println!("{} {}", "checkprofile".bold(), analyzer.dimmed());
    println!();

    if reported.is_empty() {
        println!("{}", "No findings reported.".green());
    } else {
        for finding in reported {
            println!(
                "  {} {}:{}  {} {}",
                severity_label(finding.severity),
                finding.file,
                finding.line,
                finding.message,
                format!("[{}]", finding.id).dimmed()
            );
        }
    }

    if show_filtered && !filtered.is_empty() {
        println!();
        println!("{}", "Filtered:".dimmed().bold());
        for finding in filtered {
            println!(
                "  {}",
                format!(
                    "{}:{}  {} [{}]",
                    finding.file, finding.line, finding.message, finding.id
                )
                .dimmed()
            );
        }
    }

    println!();
    println!(
        "{} of {} findings reported, {} filtered",
        reported.len().to_string().bold(),
        received,
        filtered.len()
    );
}
