use super::super::args::CreateFileArgs;
use crate::exit_codes::SUCCESS;

pub(crate) fn run(args: CreateFileArgs) -> anyhow::Result<i32> {
    let path = softnunit_core::create_file(&args.path)?;
    println!("{}", path.display());
    Ok(SUCCESS)
}
