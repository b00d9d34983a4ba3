use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod common;
pub mod run;
pub use common::*;
pub use run::*;

#[derive(Parser)]
#[command(
    name = "softnunit",
    version,
    about = "Soft NUnit 3 runner: run nunit3-console without failing the build on failing tests"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run test assemblies through nunit3-console
    Run(RunArgs),
    /// List tests that did not pass in one or more result files
    NonPassing(NonPassingArgs),
    /// Replace a file with an empty one
    CreateFile(CreateFileArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct NonPassingArgs {
    /// NUnit 3 result files (TestResult.xml)
    #[arg(required = true)]
    pub reports: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CreateFileArgs {
    pub path: PathBuf,
}

#[cfg(test)]
mod tests;
