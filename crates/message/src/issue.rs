//! Structured per-message problem reports.
//!
//! An [`Issue`] records one thing that went wrong (or nearly went wrong)
//! while producing a derivative. Issues accumulate on the message instead of
//! aborting the batch: a failed message carries its own diagnosis and the
//! next message proceeds untouched.

use derive_more::Display;
use std::fmt::{self, Formatter};

/// How serious an [`Issue`] is.
///
/// Warnings are advisory (the derivative may still have been produced);
/// errors mean the derivative for this message is missing or incomplete.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    #[display("warning")]
    Warning,
    #[display("error")]
    Error,
}

/// A single structured failure description attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub description: String,
    /// Rendered underlying cause, when one exists.
    pub detail: Option<String>,
}

impl Issue {
    pub fn warning(description: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, description: description.into(), detail: None }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self { severity: Severity::Error, description: description.into(), detail: None }
    }

    /// Attaches the rendered form of an underlying cause.
    pub fn caused_by(mut self, cause: impl fmt::Display) -> Self {
        self.detail = Some(cause.to_string());
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.description)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}
