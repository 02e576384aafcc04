//! Chrome/Chromium single-page PDF rendering.
//!
//! Three stages: [`pagefit::prepare`] rewrites an HTML document so that it
//! prints onto exactly one page, [`Renderer`] writes the result to disk and
//! drives the external renderer subprocess, and [`Stylesheet`] supplies the
//! CSS injected along the way. The renderer executable is located once, at
//! [`Renderer::new`]; use [`Renderer::available`] as the startup capability
//! check before registering the derivative type at all.

mod chrome;
pub mod error;
pub mod pagefit;
mod render;
mod style;

pub use crate::chrome::IN_CONTAINER_ENV;
pub use crate::render::{DEFAULT_TIMEOUT, RenderJob, Renderer};
pub use crate::style::{DEFAULT_BUILTIN, Stylesheet};
