//! Message data model shared by the derivative pipeline.
//!
//! The message store itself lives outside this workspace; derivative
//! generators receive a [`Message`], append zero or more [`Issue`]s to it,
//! and hand it back. Nothing else on the message is ever mutated.

mod issue;
mod message;
pub mod path;

pub use crate::issue::{Issue, Severity};
pub use crate::message::Message;
pub use crate::path::{MAX_PATH_LENGTH, check_path_length};
