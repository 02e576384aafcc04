//! Stylesheet loading for rendered messages.
//!
//! A [`Stylesheet`] can come from a compile-time embedded builtin (see
//! [`Stylesheet::list_builtins`]), a file on disk, or raw CSS content. File
//! contents are read eagerly at construction time so that missing files fail
//! fast rather than at render time.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use rust_embed::Embed;
use std::borrow::Cow;
use std::path::Path;

#[derive(Embed)]
#[folder = "../../assets/styles/"]
struct Builtins;

/// Name of the stylesheet applied when no custom CSS is configured.
pub const DEFAULT_BUILTIN: &str = "email.css";

/// A single CSS stylesheet to inject into every rendered message.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    css: String,
}

impl Stylesheet {
    /// Loads an embedded builtin stylesheet by name.
    ///
    /// Returns [`ErrorKind::AssetNotFound`] if `name` does not match any
    /// embedded asset. Use [`list_builtins()`](Self::list_builtins) to
    /// discover available names.
    pub fn builtin(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();
        let asset = Builtins::get(name).ok_or_raise(|| ErrorKind::AssetNotFound(identifier(name)))?;
        let css = String::from_utf8_lossy(&asset.data).into_owned();
        Ok(Self { css })
    }

    /// Reads a stylesheet from a file on disk.
    ///
    /// The file is read immediately so that missing or unreadable files
    /// surface as errors during construction rather than at render time.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            exn::bail!(ErrorKind::AssetNotFound(path.display().to_string()));
        }
        let css = std::fs::read_to_string(path).or_raise(|| ErrorKind::Io)?;
        Ok(Self { css })
    }

    /// Wraps raw CSS content. Infallible since no I/O is involved.
    pub fn from_content(css: impl Into<String>) -> Self {
        Self { css: css.into() }
    }

    /// Returns the names of all embedded builtin stylesheets.
    pub fn list_builtins() -> Vec<Cow<'static, str>> {
        Builtins::iter().filter(|f| f.ends_with(".css")).collect()
    }

    pub fn css(&self) -> &str {
        &self.css
    }
}

fn identifier(name: impl AsRef<str>) -> String {
    format!("builtin:{}", name.as_ref().trim().trim_start_matches("builtin:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_builtin_loads() {
        let stylesheet = Stylesheet::builtin(DEFAULT_BUILTIN).unwrap();
        assert!(stylesheet.css().contains("body"));
    }

    #[test]
    fn list_includes_default() {
        assert!(Stylesheet::list_builtins().iter().any(|s| s == DEFAULT_BUILTIN));
    }

    #[test]
    fn unknown_builtin_is_asset_not_found() {
        let error = Stylesheet::builtin("nope.css").unwrap_err();
        assert!(matches!(&*error, ErrorKind::AssetNotFound(name) if name == "builtin:nope.css"));
    }

    #[test]
    fn missing_file_fails_fast() {
        assert!(Stylesheet::from_file("/no/such/stylesheet.css").is_err());
    }

    #[test]
    fn file_contents_are_read_eagerly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.css");
        std::fs::write(&path, "p { color: red; }").unwrap();
        let stylesheet = Stylesheet::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(stylesheet.css(), "p { color: red; }");
    }
}
