//! Structured issue records handed back to callers.
//!
//! The pipeline never prints; it returns a list of these and lets the
//! driver decide formatting.
use crate::Error;
use serde::Serialize;

/// Whether an issue invalidates the compilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic record.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub reason: String,
    pub line: u32,
    pub col: u32,
}

impl Report {
    pub fn new(severity: Severity, err: &Error) -> Self {
        let pos = err.location();
        Report {
            severity,
            reason: err.message(),
            line: pos.line,
            col: pos.col,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        };
        write!(f, "{}: {} [{}:{}]", tag, self.reason, self.line, self.col)
    }
}
