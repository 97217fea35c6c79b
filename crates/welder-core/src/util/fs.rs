//! Filesystem utilities.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use welder_types::{Result, WelderError};

/// Expand path with tilde.
pub fn expand_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    // Handle tilde expansion
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }

    path.to_path_buf()
}

/// Make sure a file and every directory above it exist.
///
/// Missing directories are created recursively and a missing file is created
/// empty. Existing content is left untouched.
pub fn ensure_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| WelderError::filesystem(parent, e))?;
    }

    if !path.is_file() {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| WelderError::filesystem(path, e))?;
    }

    Ok(())
}
