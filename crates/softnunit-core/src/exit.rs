//! Exit-code classification for the NUnit 3 console.
//!
//! The console reports the number of failed tests as a positive exit code.
//! A soft run tolerates those, so only the negative codes, which signal that
//! the console itself could not do its job, are treated as failures.

use std::fmt;

use crate::error::{SoftRunError, SoftRunResult};

/// Failure categories of the NUnit 3 console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitCategory {
    InvalidArgument,
    InvalidAssembly,
    UnrecognisedError,
    InvalidTestFixture,
    UnloadError,
    UnexpectedError,
}

impl ExitCategory {
    /// Map a negative console exit code to its category.
    /// Unknown negative codes fall back to [`ExitCategory::UnrecognisedError`].
    pub fn from_code(code: i32) -> Self {
        match code {
            -1 => Self::InvalidArgument,
            -2 => Self::InvalidAssembly,
            -3 => Self::UnrecognisedError,
            -4 => Self::InvalidTestFixture,
            -5 => Self::UnloadError,
            -100 => Self::UnexpectedError,
            _ => Self::UnrecognisedError,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidArgument => "Invalid argument",
            Self::InvalidAssembly => "Invalid assembly",
            Self::UnrecognisedError => "Unrecognised error",
            Self::InvalidTestFixture => "Invalid test fixture",
            Self::UnloadError => "Unload error",
            Self::UnexpectedError => "Unexpected error",
        }
    }
}

impl fmt::Display for ExitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Positive codes count failed or not-run tests; they are not errors here.
pub fn normalize(exit_code: i32) -> i32 {
    if exit_code > 0 {
        0
    } else {
        exit_code
    }
}

/// `None` means success.
pub fn classify(exit_code: i32) -> Option<ExitCategory> {
    match normalize(exit_code) {
        0 => None,
        code => Some(ExitCategory::from_code(code)),
    }
}

/// Turn a console exit code into a result for `tool`.
pub fn check_exit_code(tool: &str, exit_code: i32) -> SoftRunResult<()> {
    match classify(exit_code) {
        None => Ok(()),
        Some(category) => Err(SoftRunError::ToolInvocation {
            tool: tool.to_string(),
            category,
            exit_code,
        }),
    }
}
