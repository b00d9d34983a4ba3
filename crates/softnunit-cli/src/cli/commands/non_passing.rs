use super::super::args::{NonPassingArgs, OutputFormat};
use crate::exit_codes::SUCCESS;

pub(crate) fn run(args: NonPassingArgs) -> anyhow::Result<i32> {
    let names = softnunit_core::non_passing_tests(&args.reports)?;
    print_names(&names, &args.format)?;
    Ok(SUCCESS)
}

pub(crate) fn print_names(names: &[String], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for name in names {
                println!("{name}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(names)?),
    }
    Ok(())
}
