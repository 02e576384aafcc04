use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

/// Environment variable signalling execution inside a container, where
/// Chrome runs as an unprivileged-equivalent root and needs its sandbox
/// disabled. Fixed contract with container images; do not rename.
pub const IN_CONTAINER_ENV: &str = "IN_CONTAINER";

/// Candidate executable names, probed in order.
const CANDIDATES: &[&str] = &["google-chrome", "chromium", "chromium-browser", "chrome"];

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Handle to a discovered Chrome/Chromium executable.
///
/// Resolved once at startup and immutable for the lifetime of the run.
#[derive(Debug, Clone)]
pub(crate) struct Chrome {
    path: PathBuf,
}

impl Chrome {
    /// Probes the fixed candidate list and returns the first executable found
    /// on the search path.
    ///
    /// Raises [`ErrorKind::ChromeNotFound`] when nothing matches; lookup
    /// failures of any kind are treated identically to not-found.
    pub(crate) fn discover() -> Result<Self> {
        Self::discover_from(CANDIDATES)
    }

    fn discover_from(candidates: &[&str]) -> Result<Self> {
        for candidate in candidates {
            if let Ok(path) = which::which(candidate) {
                tracing::debug!(chrome = %path.display(), "discovered renderer executable");
                return Ok(Self { path });
            }
        }
        tracing::info!("no chrome/chromium executable found in PATH");
        exn::bail!(ErrorKind::ChromeNotFound);
    }

    /// Uses an explicit executable path, bypassing discovery.
    pub(crate) fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Builds the print-to-PDF invocation.
    ///
    /// `--run-all-compositor-stages-before-draw` makes Chrome wait for the
    /// page-fit script to have rewritten the page geometry before printing.
    /// Both paths must already be absolute.
    fn command(&self, html: &Path, pdf: &Path, no_sandbox: bool) -> Command {
        let mut command = Command::new(&self.path);
        command
            .arg("--headless")
            .arg("--run-all-compositor-stages-before-draw")
            .arg("--disable-gpu")
            .arg("--no-pdf-header-footer");
        if no_sandbox {
            command.arg("--no-sandbox");
        }
        let mut print_to_pdf = std::ffi::OsString::from("--print-to-pdf=");
        print_to_pdf.push(pdf);
        command.arg(print_to_pdf).arg(html);
        command
    }

    /// Runs the renderer synchronously and interprets its exit status.
    ///
    /// Exit code zero is success. Anything else raises
    /// [`ErrorKind::RenderFailed`] carrying the captured stdout/stderr.
    pub(crate) fn execute(&self, html: &Path, pdf: &Path, timeout: Option<Duration>) -> Result<()> {
        let mut command = self.command(html, pdf, in_container());
        tracing::debug!(?command, "invoking renderer");
        let output = run_captured(&mut command, timeout)?;
        if output.status.success() {
            return Ok(());
        }
        exn::bail!(ErrorKind::RenderFailed {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
}

/// Whether the containerized-execution flag is set in the environment.
/// Only the value `TRUE` (case-insensitive) counts.
fn in_container() -> bool {
    std::env::var(IN_CONTAINER_ENV).is_ok_and(|value| truthy(&value))
}

fn truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

/// Runs a command to completion, capturing stdout/stderr, optionally bounded
/// by a deadline. On expiry the child is killed and reaped, and
/// [`ErrorKind::ChromeTimeout`] is raised.
fn run_captured(command: &mut Command, timeout: Option<Duration>) -> Result<Output> {
    let Some(timeout) = timeout else {
        // Unbounded: a hung renderer blocks this worker until killed externally.
        return command.output().or_raise(|| ErrorKind::Io);
    };
    command.stdout(Stdio::piped()).stderr(Stdio::piped()).stdin(Stdio::null());
    let mut child = command.spawn().or_raise(|| ErrorKind::Io)?;
    // Drain the pipes on separate threads so a chatty renderer can't fill
    // the pipe buffer and deadlock against our wait loop.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait().or_raise(|| ErrorKind::Io)? {
            break status;
        }
        if Instant::now() >= deadline {
            _ = child.kill();
            _ = child.wait();
            exn::bail!(ErrorKind::ChromeTimeout);
        }
        std::thread::sleep(POLL_INTERVAL);
    };
    let stdout = stdout.join().unwrap_or_default();
    let stderr = stderr.join().unwrap_or_default();
    Ok(Output { status, stdout, stderr })
}

fn drain(pipe: Option<impl Read + Send + 'static>) -> std::thread::JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut pipe) = pipe {
            _ = pipe.read_to_end(&mut buffer);
        }
        buffer
    })
}
