//! Render Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A render error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// No compatible headless browser on this system; the PDF derivative
    /// type is unavailable for the whole run.
    #[display("chrome/chromium not detected on your system")]
    ChromeNotFound,
    /// The renderer exceeded its deadline and was killed.
    #[display("chrome did not finish within the configured timeout")]
    ChromeTimeout,
    /// Chrome exited with a non-zero exit code (or was killed by a signal,
    /// in which case `code` is `None`). Captured output is carried along for
    /// per-message diagnostics.
    #[display("chrome exited with code {code:?}")]
    RenderFailed {
        code: Option<i32>,
        #[error(not(source))]
        stdout: String,
        #[error(not(source))]
        stderr: String,
    },
    /// Chrome reported success but the PDF never appeared on disk. The
    /// intermediate HTML is left in place for diagnosis.
    #[display("chrome exited cleanly but produced no output at {}", _0.display())]
    MissingOutput(#[error(not(source))] PathBuf),
    /// The HTML could not be prepared for single-page printing.
    #[display("malformed HTML: {_0}")]
    MalformedHtml(#[error(not(source))] String),
    /// Stylesheet was not loadable (either file or builtin).
    #[display("stylesheet not found: {_0}")]
    AssetNotFound(#[error(not(source))] String),
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ChromeTimeout | Self::Io)
    }
}
