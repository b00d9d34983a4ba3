//! Soft runner for the NUnit 3 console.
//!
//! A soft run launches `nunit3-console`, tolerates failing tests instead of
//! treating them as a broken build, and reads the result file afterwards to
//! find out which tests did not pass.
//!
//! # Quick Start
//!
//! ```no_run
//! use softnunit_core::{non_passing_tests, Environment, ResultSpec, RunSettings, SoftRunner};
//!
//! # fn example() -> softnunit_core::SoftRunResult<()> {
//! let settings = RunSettings {
//!     results: vec![ResultSpec::new("out/TestResult.xml")],
//!     ..Default::default()
//! };
//! let runner = SoftRunner::system(Environment::from_current_dir()?);
//! runner.run_pattern("src/**/bin/Release/*.Tests.dll", &settings)?;
//!
//! for name in non_passing_tests(&["out/TestResult.xml"])? {
//!     println!("not passed: {name}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Exit codes
//!
//! Positive console exit codes count failed tests and are treated as
//! success. Negative codes are mapped by [`exit::ExitCategory`] and surface
//! as [`SoftRunError::ToolInvocation`].

pub mod args;
pub mod environment;
pub mod error;
pub mod exit;
pub mod fs;
pub mod report;
pub mod runner;
pub mod settings;

/// Tool name used in error messages.
pub const TOOL_NAME: &str = "NUnit3";

/// Console executables searched for on `PATH`, in order.
pub const EXECUTABLE_NAMES: &[&str] = &["nunit3-console.exe", "nunit3-console"];

// Re-export main types
pub use args::{build_arguments, ArgumentList, ProcessArgument};
pub use environment::Environment;
pub use error::{SoftRunError, SoftRunResult};
pub use exit::{check_exit_code, classify, ExitCategory};
pub use fs::create_file;
pub use report::{non_passing_tests, parse_report, TestCase};
pub use runner::{
    GlobFiles, Globber, Invocation, PathToolLocator, ProcessRunner, RunOutcome, SoftRunner,
    SystemProcessRunner, ToolLocator,
};
pub use settings::{
    DomainUsage, LabelMode, Params, ProcessMode, ResultSpec, RunSettings, TraceLevel,
};
