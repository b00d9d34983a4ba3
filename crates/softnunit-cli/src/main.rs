use clap::Parser;

mod cli;
pub mod exit_codes;

use cli::args::Cli;
use cli::commands::dispatch;
use softnunit_core::SoftRunError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fatal: {e:?}");
            match e.downcast_ref::<SoftRunError>() {
                Some(err) if err.is_invocation_failure() => exit_codes::COMMAND_FAILED,
                _ => exit_codes::INTERNAL_ERROR,
            }
        }
    };
    std::process::exit(code);
}
