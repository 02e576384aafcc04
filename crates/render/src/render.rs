use crate::chrome::Chrome;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::instrument;

/// Everything needed to render one message, built per message and discarded
/// after the invocation completes.
#[derive(Debug)]
pub struct RenderJob {
    /// Prepared (page-fit) HTML document.
    pub html: String,
    /// Where the intermediate HTML is written; removed again once the PDF is
    /// confirmed on disk.
    pub html_path: PathBuf,
    /// Final artifact location.
    pub pdf_path: PathBuf,
    /// When set, the invoker writes no files and spawns no subprocess.
    pub dry_run: bool,
}

/// Converts prepared HTML documents into single-page PDFs via an external
/// Chrome/Chromium subprocess.
///
/// The executable handle is resolved once at construction and shared
/// read-only across messages, so one `Renderer` can serve concurrent workers
/// as long as each job uses distinct file paths.
pub struct Renderer {
    chrome: Chrome,
    timeout: Option<Duration>,
}

/// Chosen bound on one renderer invocation. The source system had none and a
/// hung renderer would block its worker forever; a minute is generous for a
/// single page.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

impl Renderer {
    /// Discovers a renderer executable on the search path.
    ///
    /// Raises [`ErrorKind::ChromeNotFound`] when none is installed, in which
    /// case the PDF derivative type is unavailable for the whole run.
    pub fn new() -> Result<Self> {
        Ok(Self { chrome: Chrome::discover()?, timeout: Some(DEFAULT_TIMEOUT) })
    }

    /// Uses an explicit executable instead of probing the search path.
    pub fn with_chrome(path: impl Into<PathBuf>) -> Self {
        Self { chrome: Chrome::at(path), timeout: Some(DEFAULT_TIMEOUT) }
    }

    /// Overrides the invocation deadline. `None` waits indefinitely.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a compatible renderer executable is installed. Intended as a
    /// startup-time capability check for the scheduling layer.
    pub fn available() -> bool {
        Chrome::discover().is_ok()
    }

    /// Writes the job's HTML to disk, invokes the renderer, and confirms the
    /// PDF artifact.
    ///
    /// On success the intermediate HTML file is deleted, but only after the
    /// PDF is confirmed to exist on disk — an exit code of zero alone is not
    /// trusted. On any failure the HTML file is left in place for diagnosis.
    #[instrument(skip_all, fields(pdf = %job.pdf_path.display()))]
    pub fn run(&self, job: &RenderJob) -> Result<()> {
        if job.dry_run {
            tracing::debug!("dry run; skipping HTML write and renderer invocation");
            return Ok(());
        }
        if let Some(parent) = job.html_path.parent() {
            std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
        }
        if let Some(parent) = job.pdf_path.parent() {
            std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Io)?;
        }
        std::fs::write(&job.html_path, job.html.as_bytes()).or_raise(|| ErrorKind::Io)?;
        let html = absolute(&job.html_path)?;
        let pdf = absolute(&job.pdf_path)?;
        self.chrome.execute(&html, &pdf, self.timeout)?;
        if !job.pdf_path.is_file() {
            exn::bail!(ErrorKind::MissingOutput(job.pdf_path.clone()));
        }
        std::fs::remove_file(&job.html_path).or_raise(|| ErrorKind::Io)?;
        tracing::debug!("created PDF derivative");
        Ok(())
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).or_raise(|| ErrorKind::Io)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// Writes an executable shell script standing in for Chrome.
    fn fake_chrome(dir: &Path, script: &str) -> PathBuf {
        let path = dir.join("fake-chrome");
        std::fs::write(&path, format!("#!/bin/sh\n{script}")).unwrap();
        let mut permissions = std::fs::metadata(&path).unwrap().permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(&path, permissions).unwrap();
        path
    }

    /// A fake renderer that honours `--print-to-pdf=` and exits cleanly.
    const WELL_BEHAVED: &str = r#"
for arg in "$@"; do
    case "$arg" in
        --print-to-pdf=*) printf '%%PDF-1.4' > "${arg#--print-to-pdf=}" ;;
    esac
done
exit 0
"#;

    fn job(dir: &Path, dry_run: bool) -> RenderJob {
        RenderJob {
            html: "<!DOCTYPE html>\n<html><head></head><body>Hi</body></html>".into(),
            html_path: dir.join("out/42.html"),
            pdf_path: dir.join("out/42.pdf"),
            dry_run,
        }
    }

    #[test]
    fn success_leaves_only_the_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let chrome = fake_chrome(dir.path(), WELL_BEHAVED);
        let renderer = Renderer::with_chrome(chrome);
        let job = job(dir.path(), false);
        renderer.run(&job).unwrap();
        assert!(job.pdf_path.is_file());
        assert!(!job.html_path.exists());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let chrome = fake_chrome(dir.path(), "exit 1");
        let renderer = Renderer::with_chrome(chrome);
        let job = job(dir.path(), true);
        renderer.run(&job).unwrap();
        assert!(!job.html_path.exists());
        assert!(!job.pdf_path.exists());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn failure_retains_html_and_captures_streams() {
        let dir = tempfile::tempdir().unwrap();
        let chrome = fake_chrome(dir.path(), "echo partial output\necho render exploded >&2\nexit 3");
        let renderer = Renderer::with_chrome(chrome);
        let job = job(dir.path(), false);
        let error = renderer.run(&job).unwrap_err();
        match &*error {
            ErrorKind::RenderFailed { code, stdout, stderr } => {
                assert_eq!(*code, Some(3));
                assert!(stdout.contains("partial output"));
                assert!(stderr.contains("render exploded"));
            },
            other => panic!("expected RenderFailed, got {other:?}"),
        }
        assert!(job.html_path.is_file());
        assert!(!job.pdf_path.exists());
    }

    #[test]
    fn clean_exit_without_pdf_is_not_success() {
        let dir = tempfile::tempdir().unwrap();
        let chrome = fake_chrome(dir.path(), "exit 0");
        let renderer = Renderer::with_chrome(chrome);
        let job = job(dir.path(), false);
        let error = renderer.run(&job).unwrap_err();
        assert!(matches!(&*error, ErrorKind::MissingOutput(path) if path == &job.pdf_path));
        // The renderer lied about success; keep the input for diagnosis.
        assert!(job.html_path.is_file());
    }

    #[test]
    fn hung_renderer_hits_the_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let chrome = fake_chrome(dir.path(), "sleep 30");
        let renderer = Renderer::with_chrome(chrome).timeout(Some(Duration::from_millis(200)));
        let job = job(dir.path(), false);
        let error = renderer.run(&job).unwrap_err();
        assert!(matches!(&*error, ErrorKind::ChromeTimeout));
        assert!(job.html_path.is_file());
    }

    #[test]
    fn html_is_written_verbatim_as_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let chrome = fake_chrome(dir.path(), "exit 7");
        let renderer = Renderer::with_chrome(chrome);
        let mut job = job(dir.path(), false);
        job.html = "<html><head></head><body>caf\u{e9} – ♥</body></html>".into();
        _ = renderer.run(&job);
        let written = std::fs::read_to_string(&job.html_path).unwrap();
        assert_eq!(written, job.html);
    }
}
