use routemap::cli::run_cli;
use routemap::logging::{init_logging, LogConfig};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    init_logging(&LogConfig::from_env())?;
    run_cli()
}
