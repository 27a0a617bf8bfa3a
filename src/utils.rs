//! Path expansion and pre-flight validation helpers

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Expand a leading `~` or `~/` to the user's home directory.
///
/// Any other path, including `~user` forms, is returned unchanged. If the
/// home directory cannot be determined the path is also returned unchanged
/// and the later validation reports the miss.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = home::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Check that the input is an existing, readable regular file.
pub fn validate_input_file(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        Error::InputFile(format!("audio file does not exist: {}: {e}", path.display()))
    })?;
    if !metadata.is_file() {
        return Err(Error::InputFile(format!(
            "path is not a regular file: {}",
            path.display()
        )));
    }
    std::fs::File::open(path).map_err(|e| {
        Error::InputFile(format!("audio file is not readable: {}: {e}", path.display()))
    })?;
    Ok(())
}

/// Create the output directory (and parents) if it does not exist yet.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| {
        Error::InputFile(format!(
            "failed to create output directory {}: {e}",
            path.display()
        ))
    })
}
