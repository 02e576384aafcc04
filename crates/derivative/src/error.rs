//! Derivative Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A derivative error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for derivative operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// No compatible renderer installed; skip this derivative type for the
    /// whole run. A startup-time decision, never raised per message.
    #[display("PDF derivative type unavailable: no renderer installed")]
    Unavailable,
    /// The configured (or builtin) stylesheet could not be loaded.
    #[display("failed to load stylesheet")]
    Stylesheet,
    /// The message carries neither an HTML nor a plain-text body.
    #[display("message has no HTML or plain text body")]
    EmptyMessage,
    /// The HTML-formatting collaborator failed to produce a document.
    #[display("failed to format message as HTML")]
    Format,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
