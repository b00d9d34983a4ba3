//! File helpers for build scripts.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{SoftRunError, SoftRunResult};

/// Replace whatever is at `path` with an empty file and return the path.
pub fn create_file(path: impl AsRef<Path>) -> SoftRunResult<PathBuf> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(SoftRunError::MissingArgument { name: "path" });
    }
    let io_err = |source| SoftRunError::Io {
        path: path.to_path_buf(),
        source,
    };

    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(e)),
    }
    std::fs::File::create(path).map_err(io_err)?;

    debug!(path = %path.display(), "file successfully created");
    Ok(path.to_path_buf())
}
