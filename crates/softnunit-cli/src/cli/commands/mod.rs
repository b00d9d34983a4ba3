use super::args::*;

pub(crate) mod create_file;
pub(crate) mod non_passing;
pub(crate) mod run;

use crate::exit_codes::SUCCESS;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => run::run(args),
        Command::NonPassing(args) => non_passing::run(args),
        Command::CreateFile(args) => create_file::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
