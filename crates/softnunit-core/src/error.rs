//! Error types for the soft runner.

use std::path::PathBuf;

use crate::exit::ExitCategory;

/// Soft runner errors.
#[derive(Debug, thiserror::Error)]
pub enum SoftRunError {
    /// A required argument was empty or missing.
    #[error("missing argument: {name}")]
    MissingArgument { name: &'static str },

    /// Settings combination rejected before anything was spawned.
    #[error("{tool}: {message}")]
    Config { tool: String, message: String },

    /// Settings file could not be read or parsed.
    #[error("invalid settings file {}: {message}", .path.display())]
    ConfigFile { path: PathBuf, message: String },

    /// The console returned a failing exit code.
    #[error("{tool}: {category} (exit code {exit_code}).")]
    ToolInvocation {
        tool: String,
        category: ExitCategory,
        exit_code: i32,
    },

    /// The console exited without an exit code (killed by a signal).
    #[error("{tool}: process terminated without an exit code")]
    Terminated { tool: String },

    /// No console executable could be found.
    #[error("{tool}: could not locate executable (tried {})", .candidates.join(", "))]
    ToolNotFound {
        tool: String,
        candidates: Vec<String>,
    },

    /// The console could not be started.
    #[error("{tool}: failed to start {}: {source}", .program.display())]
    Spawn {
        tool: String,
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report file is missing or is not well-formed.
    #[error("failed to parse report {}: {message}", .path.display())]
    Report { path: PathBuf, message: String },

    /// Invalid glob pattern or unreadable match.
    #[error("invalid pattern {pattern}: {message}")]
    Glob { pattern: String, message: String },

    /// File system error.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SoftRunError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            // The console ran (or tried to) and failed
            Self::ToolInvocation { .. } => 1,
            Self::Terminated { .. } => 1,
            Self::Spawn { .. } => 1,

            // Input, configuration and report problems
            Self::MissingArgument { .. } => 2,
            Self::Config { .. } => 2,
            Self::ConfigFile { .. } => 2,
            Self::ToolNotFound { .. } => 2,
            Self::Report { .. } => 2,
            Self::Glob { .. } => 2,
            Self::Io { .. } => 2,
        }
    }

    /// Errors of taxonomy "tool invocation": the console could not be
    /// started or did not finish successfully.
    pub fn is_invocation_failure(&self) -> bool {
        matches!(
            self,
            Self::ToolInvocation { .. } | Self::Terminated { .. } | Self::Spawn { .. }
        )
    }

    pub(crate) fn report(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Report {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result type for soft runner operations.
pub type SoftRunResult<T> = Result<T, SoftRunError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_invocation_message_names_tool_category_and_code() {
        let err = SoftRunError::ToolInvocation {
            tool: "NUnit3".into(),
            category: ExitCategory::InvalidAssembly,
            exit_code: -2,
        };
        assert_eq!(err.to_string(), "NUnit3: Invalid assembly (exit code -2).");
        assert_eq!(err.exit_code(), 1);
        assert!(err.is_invocation_failure());
    }

    #[test]
    fn config_errors_are_not_invocation_failures() {
        let err = SoftRunError::Config {
            tool: "NUnit3".into(),
            message: "bad".into(),
        };
        assert_eq!(err.to_string(), "NUnit3: bad");
        assert_eq!(err.exit_code(), 2);
        assert!(!err.is_invocation_failure());
    }

    #[test]
    fn tool_not_found_lists_candidates() {
        let err = SoftRunError::ToolNotFound {
            tool: "NUnit3".into(),
            candidates: vec!["a.exe".into(), "a".into()],
        };
        assert_eq!(
            err.to_string(),
            "NUnit3: could not locate executable (tried a.exe, a)"
        );
    }
}
