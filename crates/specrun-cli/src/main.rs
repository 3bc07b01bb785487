//! Specrun CLI entry point

use clap::Parser;
use specrun_cli::{build_config, handlers, init_logging, Cli, CliResult, Commands};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_logging(&config);

    match cli.command {
        Commands::Test(args) => {
            handlers::execute_test(&config, &args)?;
            Ok(())
        }
        Commands::List(args) => {
            let listing = handlers::execute_list(&args)?;
            print!("{listing}");
            Ok(())
        }
    }
}
