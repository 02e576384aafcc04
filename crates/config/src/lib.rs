//! Layered configuration for the derivative pipeline.
//!
//! Values merge from defaults, then an `epistle.toml` file in the working
//! directory, then `EPISTLE_`-prefixed environment variables (highest
//! precedence). The `IN_CONTAINER` flag is intentionally *not* handled here:
//! its name is a fixed contract with container images and is read where the
//! renderer command is built.

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default configuration file, resolved relative to the working directory.
pub const CONFIG_FILE: &str = "epistle.toml";
/// Environment variable prefix for overrides (e.g. `EPISTLE_DRY_RUN=true`).
pub const ENV_PREFIX: &str = "EPISTLE_";

const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Settings for one run of the PDF derivative generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory under which per-message derivative subdirectories are created.
    pub output_root: PathBuf,
    /// Validate and log, but write no files and spawn no subprocesses.
    pub dry_run: bool,
    /// Optional custom stylesheet injected into every rendered message.
    /// Falls back to the builtin email stylesheet when unset.
    pub css: Option<PathBuf>,
    /// Explicit renderer executable, bypassing `PATH` discovery.
    pub chrome: Option<PathBuf>,
    /// Upper bound on one renderer invocation, in seconds. `0` disables the
    /// bound entirely (a hung renderer then blocks its worker indefinitely).
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            dry_run: false,
            css: None,
            chrome: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl Config {
    /// Loads configuration from `epistle.toml` and the environment.
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::new().merge(Toml::file(CONFIG_FILE)).merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Invalid)?;
        tracing::debug!(?config, "configuration resolved");
        Ok(config)
    }

    /// The renderer invocation deadline, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}
