//! Working directory used to resolve relative paths.

use std::path::{Path, PathBuf};

use crate::error::{SoftRunError, SoftRunResult};

/// Working-directory context that relative paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    working_dir: PathBuf,
}

impl Environment {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Environment rooted at the process's current directory.
    pub fn from_current_dir() -> SoftRunResult<Self> {
        let cwd = std::env::current_dir().map_err(|source| SoftRunError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Ok(Self::new(cwd))
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Absolute form of `path`; already-absolute paths are returned unchanged.
    pub fn make_absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_dir.join(path)
        }
    }

    /// [`Environment::make_absolute`] rendered for a command-line token.
    ///
    /// Paths that are not valid UTF-8 are rejected rather than rendered lossily.
    pub fn absolute_string(&self, path: &Path) -> SoftRunResult<String> {
        let absolute = self.make_absolute(path);
        match absolute.to_str() {
            Some(s) => Ok(s.to_string()),
            None => Err(SoftRunError::Io {
                path: absolute.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "path is not valid UTF-8",
                ),
            }),
        }
    }
}
