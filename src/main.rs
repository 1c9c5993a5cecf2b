//! checkprofile CLI entry point.

use clap::Parser;
use checkprofile::cli::{self, Cli, Commands, EXIT_ERROR};
use checkprofile::log;

fn main() {
    let cli = Cli::parse();
    log::init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Report(args) => cli::run_report(config, args),
        Commands::List(args) => cli::run_list(config, args),
        Commands::Set(args) => cli::run_set(config, args),
        Commands::Reset => cli::run_reset(config),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
