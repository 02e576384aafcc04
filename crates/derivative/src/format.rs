//! The HTML-formatting seam.
//!
//! The production archiving pipeline brings its own templating helper that
//! turns a message into styled HTML; this trait is the boundary it plugs
//! into. [`BasicFormatter`] is the stock implementation: HTML bodies pass
//! through untouched, plain-text bodies get escaped and wrapped in a minimal
//! UTF-8 document.

use crate::error::{ErrorKind, Result};
use epistle_message::Message;

/// Produces the HTML document rendered into a PDF for one message.
pub trait HtmlFormatter {
    /// Formatting failures become error issues on the message; they never
    /// abort the batch, and no PDF is attempted for that message.
    fn format(&self, message: &Message) -> Result<String>;
}

/// Passthrough/wrapping formatter used when no templating helper is plugged in.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicFormatter;

impl HtmlFormatter for BasicFormatter {
    fn format(&self, message: &Message) -> Result<String> {
        if let Some(html) = &message.html_body {
            return Ok(html.clone());
        }
        if let Some(text) = &message.text_body {
            return Ok(wrap_text(text));
        }
        exn::bail!(ErrorKind::EmptyMessage);
    }
}

fn wrap_text(text: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"></head><body><pre>{}</pre></body></html>",
        escape(text),
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
