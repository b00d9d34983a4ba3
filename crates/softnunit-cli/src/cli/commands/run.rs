use anyhow::Context;
use softnunit_core::{non_passing_tests, Environment, RunOutcome, RunSettings, SoftRunner, TOOL_NAME};

use super::super::args::{OutputFormat, RunArgs};
use super::non_passing::print_names;
use crate::exit_codes::SUCCESS;

pub(crate) fn run(args: RunArgs) -> anyhow::Result<i32> {
    let environment = Environment::from_current_dir()?;
    let settings = args.settings(environment.working_dir())?;
    let runner = SoftRunner::system(environment);

    if args.dry_run {
        let invocation = match &args.pattern {
            Some(pattern) => runner.plan_pattern(pattern, &settings)?,
            None => Some(runner.plan(&args.assemblies, &settings)?),
        };
        if let Some(invocation) = invocation {
            println!("{}", invocation.command_line());
        }
        return Ok(SUCCESS);
    }

    let outcome = match &args.pattern {
        Some(pattern) => runner.run_pattern(pattern, &settings)?,
        None => runner.run(&args.assemblies, &settings)?,
    };

    if let RunOutcome::Completed { exit_code } = outcome {
        if exit_code > 0 {
            eprintln!("{TOOL_NAME}: {exit_code} test(s) did not pass; continuing (soft run)");
        }
        if args.summarize {
            summarize(&settings, runner.environment())?;
        }
    }
    Ok(SUCCESS)
}

fn summarize(settings: &RunSettings, environment: &Environment) -> anyhow::Result<()> {
    let reports = settings.report_paths(environment);
    if reports.is_empty() {
        eprintln!("WARN: --summarize needs an nunit3 result file; none is written by this run");
        return Ok(());
    }
    let names = non_passing_tests(&reports).context("failed to summarize results")?;
    eprintln!("{} test(s) did not pass", names.len());
    print_names(&names, &OutputFormat::Text)
}
