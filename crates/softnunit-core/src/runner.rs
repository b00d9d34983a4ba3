//! The soft runner and the host collaborators it is built from.
//!
//! [`SoftRunner`] does no I/O of its own: globbing, tool lookup and process
//! execution go through the [`Globber`], [`ToolLocator`] and
//! [`ProcessRunner`] it was constructed with. [`SoftRunner::system`] wires
//! up the default implementations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::args::{build_arguments, ArgumentList};
use crate::environment::Environment;
use crate::error::{SoftRunError, SoftRunResult};
use crate::exit::check_exit_code;
use crate::settings::RunSettings;
use crate::{EXECUTABLE_NAMES, TOOL_NAME};

/// Resolves a file pattern to concrete paths.
pub trait Globber {
    fn files(&self, pattern: &str) -> SoftRunResult<Vec<PathBuf>>;
}

/// Finds the console executable.
pub trait ToolLocator {
    /// `explicit` is the user's override and wins when set.
    fn locate(&self, candidates: &[&str], explicit: Option<&Path>) -> SoftRunResult<PathBuf>;
}

/// Launches a process and blocks until it exits.
pub trait ProcessRunner {
    /// Exit code of the process, or `None` when it had none (killed by a signal).
    fn run(&self, invocation: &Invocation) -> SoftRunResult<Option<i32>>;
}

/// Everything needed to launch the console once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: ArgumentList,
    pub working_dir: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    /// Display form of the full command line.
    pub fn command_line(&self) -> String {
        let program = self.program.display().to_string();
        let program = if program.chars().any(char::is_whitespace) {
            format!("\"{program}\"")
        } else {
            program
        };
        if self.args.is_empty() {
            program
        } else {
            format!("{program} {}", self.args)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The pattern matched no files; nothing was launched.
    NoMatches,
    /// The console ran and its exit code classified as success.
    /// `exit_code` is the raw code, i.e. the number of non-passing tests.
    Completed { exit_code: i32 },
}

pub struct SoftRunner {
    environment: Environment,
    globber: Box<dyn Globber>,
    locator: Box<dyn ToolLocator>,
    process: Box<dyn ProcessRunner>,
}

impl SoftRunner {
    pub fn new(
        environment: Environment,
        globber: Box<dyn Globber>,
        locator: Box<dyn ToolLocator>,
        process: Box<dyn ProcessRunner>,
    ) -> Self {
        Self {
            environment,
            globber,
            locator,
            process,
        }
    }

    /// Runner backed by the file system, `PATH` and real child processes.
    pub fn system(environment: Environment) -> Self {
        let globber = GlobFiles::new(environment.clone());
        Self::new(
            environment,
            Box::new(globber),
            Box::new(PathToolLocator),
            Box::new(SystemProcessRunner),
        )
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Run the assemblies matching `pattern`. No match is not an error.
    pub fn run_pattern(&self, pattern: &str, settings: &RunSettings) -> SoftRunResult<RunOutcome> {
        if pattern.trim().is_empty() {
            return Err(SoftRunError::MissingArgument { name: "pattern" });
        }
        let assemblies = self.globber.files(pattern)?;
        if assemblies.is_empty() {
            debug!(pattern, "The provided pattern did not match any files.");
            return Ok(RunOutcome::NoMatches);
        }
        self.run(&assemblies, settings)
    }

    /// [`SoftRunner::plan`] for the assemblies matching `pattern`; `None`
    /// when nothing matched.
    pub fn plan_pattern(
        &self,
        pattern: &str,
        settings: &RunSettings,
    ) -> SoftRunResult<Option<Invocation>> {
        if pattern.trim().is_empty() {
            return Err(SoftRunError::MissingArgument { name: "pattern" });
        }
        let assemblies = self.globber.files(pattern)?;
        if assemblies.is_empty() {
            debug!(pattern, "The provided pattern did not match any files.");
            return Ok(None);
        }
        self.plan(&assemblies, settings).map(Some)
    }

    /// Run the console over `assemblies` and wait for it.
    pub fn run<P: AsRef<Path>>(
        &self,
        assemblies: &[P],
        settings: &RunSettings,
    ) -> SoftRunResult<RunOutcome> {
        let invocation = self.plan(assemblies, settings)?;
        info!(command = %invocation.command_line(), "running {}", TOOL_NAME);

        let exit_code = self
            .process
            .run(&invocation)?
            .ok_or_else(|| SoftRunError::Terminated {
                tool: TOOL_NAME.to_string(),
            })?;
        debug!(exit_code, "{} exited", TOOL_NAME);

        check_exit_code(TOOL_NAME, exit_code)?;
        Ok(RunOutcome::Completed { exit_code })
    }

    /// Build the invocation without launching anything.
    pub fn plan<P: AsRef<Path>>(
        &self,
        assemblies: &[P],
        settings: &RunSettings,
    ) -> SoftRunResult<Invocation> {
        let args = build_arguments(assemblies, settings, &self.environment)?;
        let explicit = settings
            .tool_path
            .as_deref()
            .map(|p| self.environment.make_absolute(p));
        let program = self.locator.locate(EXECUTABLE_NAMES, explicit.as_deref())?;
        let working_dir = settings
            .working_directory
            .as_deref()
            .map(|p| self.environment.make_absolute(p));

        Ok(Invocation {
            program,
            args,
            working_dir,
            env: settings.environment.clone(),
        })
    }
}

/// [`Globber`] over the file system; relative patterns are rooted at the
/// environment's working directory.
#[derive(Debug, Clone)]
pub struct GlobFiles {
    environment: Environment,
}

impl GlobFiles {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }
}

impl Globber for GlobFiles {
    fn files(&self, pattern: &str) -> SoftRunResult<Vec<PathBuf>> {
        let glob_err = |message: String| SoftRunError::Glob {
            pattern: pattern.to_string(),
            message,
        };
        // Only the pattern is glob syntax; the working directory is literal.
        let rooted = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            let root = self
                .environment
                .working_dir()
                .to_str()
                .ok_or_else(|| glob_err("working directory is not valid UTF-8".to_string()))?;
            let root = glob::Pattern::escape(root);
            format!(
                "{}{}{pattern}",
                root.trim_end_matches(MAIN_SEPARATOR),
                MAIN_SEPARATOR
            )
        };

        let mut files = Vec::new();
        for entry in glob::glob(&rooted).map_err(|e| glob_err(e.to_string()))? {
            let path = entry.map_err(|e| glob_err(e.to_string()))?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// [`ToolLocator`] that honours the explicit override, then searches `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathToolLocator;

impl ToolLocator for PathToolLocator {
    fn locate(&self, candidates: &[&str], explicit: Option<&Path>) -> SoftRunResult<PathBuf> {
        if let Some(path) = explicit {
            if path.is_file() {
                return Ok(path.to_path_buf());
            }
            return Err(SoftRunError::ToolNotFound {
                tool: TOOL_NAME.to_string(),
                candidates: vec![path.display().to_string()],
            });
        }

        for name in candidates {
            if let Ok(path) = which::which(name) {
                debug!(path = %path.display(), "located {}", name);
                return Ok(path);
            }
        }

        Err(SoftRunError::ToolNotFound {
            tool: TOOL_NAME.to_string(),
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        })
    }
}

/// [`ProcessRunner`] that spawns a real child with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, invocation: &Invocation) -> SoftRunResult<Option<i32>> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(invocation.args.values())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .envs(&invocation.env);
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }

        let status = cmd.status().map_err(|source| SoftRunError::Spawn {
            tool: TOOL_NAME.to_string(),
            program: invocation.program.clone(),
            source,
        })?;
        Ok(status.code())
    }
}
