//! Problem definitions and the findings that reference them.
//!
//! A [`Problem`] is one rule from the analyzer's catalog. Only its enabled
//! flag and severity are mutable; everything else is fixed when the catalog
//! is loaded. A [`Finding`] is a concrete occurrence of a problem in a file.

use serde::{Deserialize, Serialize};

/// Separates the enabled flag from the severity in the mutable-state encoding.
const STATE_DELIMITER: char = ';';

/// Severity levels reported by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Style,
    Performance,
    Portability,
    Information,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Style => "style",
            Severity::Performance => "performance",
            Severity::Portability => "portability",
            Severity::Information => "information",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "style" => Ok(Severity::Style),
            "performance" => Ok(Severity::Performance),
            "portability" => Ok(Severity::Portability),
            "information" => Ok(Severity::Information),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// A single rule definition from the analyzer catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    id: String,
    category: String,
    message: String,
    enabled: bool,
    severity: Severity,
    default_enabled: bool,
    default_severity: Severity,
}

impl Problem {
    /// Create a problem whose defaults are the given enabled flag and severity.
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        message: impl Into<String>,
        enabled: bool,
        severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            message: message.into(),
            enabled,
            severity,
            default_enabled: enabled,
            default_severity: severity,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_severity(&mut self, severity: Severity) {
        self.severity = severity;
    }

    /// Encode the mutable fields as `<enabled>;<severity>`.
    pub fn serialize_mutable_state(&self) -> String {
        format!("{}{}{}", self.enabled, STATE_DELIMITER, self.severity)
    }

    /// Apply an encoding produced by [`Problem::serialize_mutable_state`].
    ///
    /// Returns `false` and leaves the problem untouched when the input is
    /// malformed.
    pub fn deserialize_mutable_state(&mut self, encoded: &str) -> bool {
        let Some((enabled, severity)) = encoded.split_once(STATE_DELIMITER) else {
            return false;
        };
        let enabled = match enabled.trim() {
            "true" => true,
            "false" => false,
            _ => return false,
        };
        let Ok(severity) = severity.trim().parse::<Severity>() else {
            return false;
        };

        self.enabled = enabled;
        self.severity = severity;
        true
    }

    /// Restore the enabled flag and severity supplied at catalog-load time.
    pub fn reset_to_default(&mut self) {
        self.enabled = self.default_enabled;
        self.severity = self.default_severity;
    }

    /// Independent copy sharing no mutable state with `self`.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }
}

/// A concrete occurrence of a problem reported by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub message: String,
    pub severity: Severity,
    pub file: String,
    pub line: usize,
}

impl Finding {
    pub fn new(
        id: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        file: impl Into<String>,
        line: usize,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            severity,
            file: file.into(),
            line,
        }
    }
}
