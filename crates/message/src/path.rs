//! Advisory path-length validation.
//!
//! Long output paths mostly bite on Windows, where the classic `MAX_PATH`
//! limit of 260 characters still applies to tools that haven't opted into
//! long-path support. The check is advisory only: an over-long path yields a
//! warning and processing continues, since the real failure (if any) surfaces
//! at file-write time anyway.

use crate::issue::Issue;
use std::path::Path;

/// Portable worst-case path length (the Windows `MAX_PATH` limit).
pub const MAX_PATH_LENGTH: usize = 260;

/// Returns a warning [`Issue`] when `path` exceeds [`MAX_PATH_LENGTH`].
pub fn check_path_length(path: impl AsRef<Path>) -> Option<Issue> {
    let path = path.as_ref();
    let length = path.as_os_str().len();
    (length > MAX_PATH_LENGTH).then(|| {
        Issue::warning(format!(
            "path is {length} characters, over the {MAX_PATH_LENGTH} character portable limit: {}",
            path.display(),
        ))
    })
}
