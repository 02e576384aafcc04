//! Per-message orchestration of the single-page PDF derivative.
//!
//! The scheduling layer (outside this workspace) decides which derivative
//! types run; it should consult [`PdfDerivative::available`] once at startup
//! and skip this type entirely when no renderer is installed. Each message
//! then goes through [`PdfDerivative::process`], which always returns the
//! message with any failures recorded on it rather than raising.

pub mod error;
mod format;
mod pdf;

pub use crate::format::{BasicFormatter, HtmlFormatter};
pub use crate::pdf::PdfDerivative;

/// Identity of this derivative type, consumed by the scheduling and
/// reporting layers.
pub const DERIVATIVE_NAME: &str = "pdf";
pub const DERIVATIVE_FORMAT: &str = "pdf";
pub const DERIVATIVE_AGENT: &str = "chrome";
