use crate::error::{ErrorKind, Result};
use crate::format::HtmlFormatter;
use epistle_config::Config;
use epistle_message::{Issue, Message, check_path_length};
use epistle_render::error::ErrorKind as RenderErrorKind;
use epistle_render::{DEFAULT_BUILTIN, RenderJob, Renderer, Stylesheet, pagefit};
use exn::ResultExt;
use std::ops::Deref;
use tracing::instrument;

/// One PDF derivative generator, shared read-only across all messages of a run.
///
/// Resolved renderer handle and stylesheet are both fixed at construction;
/// per-message state lives entirely in the [`RenderJob`], so [`process`](Self::process)
/// is safe to call from parallel workers as long as message identifiers are
/// distinct (they key the output file names).
pub struct PdfDerivative<F> {
    config: Config,
    renderer: Renderer,
    stylesheet: Stylesheet,
    formatter: F,
}

impl<F: HtmlFormatter> PdfDerivative<F> {
    /// Resolves the renderer executable and stylesheet once, at startup.
    ///
    /// Raises [`ErrorKind::Unavailable`] when no compatible renderer is
    /// installed: the caller should then skip this derivative type for the
    /// entire run rather than retry per message.
    pub fn new(config: Config, formatter: F) -> Result<Self> {
        let renderer = match &config.chrome {
            Some(path) => Renderer::with_chrome(path.clone()),
            None => Renderer::new().or_raise(|| ErrorKind::Unavailable)?,
        }
        .timeout(config.timeout());
        let stylesheet = match &config.css {
            Some(path) => Stylesheet::from_file(path).or_raise(|| ErrorKind::Stylesheet)?,
            None => Stylesheet::builtin(DEFAULT_BUILTIN).or_raise(|| ErrorKind::Stylesheet)?,
        };
        Ok(Self { config, renderer, stylesheet, formatter })
    }

    /// Whether this derivative type can run at all on this system.
    pub fn available() -> bool {
        Renderer::available()
    }

    /// Produces the PDF derivative for one message.
    ///
    /// Never panics and never propagates errors: every failure becomes an
    /// [`Issue`] appended to the returned message, and one message's failure
    /// leaves the rest of the batch untouched.
    #[instrument(skip_all, fields(message = message.id))]
    pub fn process(&self, mut message: Message) -> Message {
        let mut issues = Vec::new();
        self.generate(&message, &mut issues);
        message.record(issues);
        message
    }

    fn generate(&self, message: &Message, issues: &mut Vec<Issue>) {
        let out_dir = self.config.output_root.join(&message.derivatives_path);
        let html_path = out_dir.join(format!("{}.html", message.id));
        let pdf_path = out_dir.join(format!("{}.pdf", message.id));
        // Advisory only: an over-long path will also fail loudly at write time.
        issues.extend(check_path_length(&out_dir));
        issues.extend(check_path_length(&pdf_path));

        if message.html_body.is_none() && message.text_body.is_none() {
            tracing::info!("no HTML or plain text body; no PDF derivative will be created");
            return;
        }

        tracing::debug!(html = %html_path.display(), pdf = %pdf_path.display(), "converting message to PDF");
        let html = match self.formatter.format(message) {
            Ok(html) => html,
            Err(e) => {
                issues.push(Issue::error("error formatting HTML for PDF derivative").caused_by(&e));
                return;
            },
        };
        let prepared = match pagefit::prepare(&html, Some(&self.stylesheet)) {
            Ok(prepared) => prepared,
            Err(e) => {
                issues.push(
                    Issue::error("error modifying HTML to print without page breaks").caused_by(&e),
                );
                return;
            },
        };
        if self.config.dry_run {
            tracing::debug!("dry run; PDF derivative not written");
            return;
        }

        let job = RenderJob { html: prepared, html_path, pdf_path, dry_run: false };
        match self.renderer.run(&job) {
            Ok(()) => tracing::debug!("successfully created {}.pdf", message.id),
            Err(e) => match e.deref() {
                RenderErrorKind::RenderFailed { stdout, stderr, .. } => {
                    if !stdout.is_empty() {
                        issues.push(Issue::warning(format!(
                            "output converting message {} to PDF: {}",
                            message.id,
                            stdout.trim(),
                        )));
                    }
                    if stderr.is_empty() {
                        issues.push(
                            Issue::error(format!("error converting message {} to PDF", message.id))
                                .caused_by(&e),
                        );
                    } else {
                        issues.push(Issue::error(format!(
                            "error converting message {} to PDF: {}",
                            message.id,
                            stderr.trim(),
                        )));
                    }
                },
                _ => {
                    issues.push(
                        Issue::error("error writing HTML and converting to PDF derivative")
                            .caused_by(&e),
                    );
                },
            },
        }
    }
}
