use crate::issue::Issue;
use std::path::PathBuf;

/// One archived email message, as handed to a derivative generator.
///
/// Derivative generators treat everything here as read-only except
/// [`errors`](Self::errors), which is append-only via [`record`](Self::record).
#[derive(Debug, Clone, Default)]
pub struct Message {
    /// Identifier unique within the account.
    pub id: u64,
    /// Rendered HTML body, when the message had one.
    pub html_body: Option<String>,
    /// Plain-text body, when the message had one.
    pub text_body: Option<String>,
    /// Relative path segment under which this message's derivatives live.
    pub derivatives_path: PathBuf,
    /// Ordered sequence of problems encountered while processing this
    /// message, across all derivative types.
    pub errors: Vec<Issue>,
}

impl Message {
    pub fn new(id: u64) -> Self {
        Self { id, ..Self::default() }
    }

    pub fn with_html_body(mut self, html: impl Into<String>) -> Self {
        self.html_body = Some(html.into());
        self
    }

    pub fn with_text_body(mut self, text: impl Into<String>) -> Self {
        self.text_body = Some(text.into());
        self
    }

    pub fn with_derivatives_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.derivatives_path = path.into();
        self
    }

    /// Appends a locally-accumulated issue sequence onto the message.
    ///
    /// Always appends, never replaces: issues recorded by earlier stages (or
    /// earlier derivative types) stay in place.
    pub fn record(&mut self, issues: Vec<Issue>) {
        self.errors.extend(issues);
    }
}
