// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, install logging, run the command.
// - Any `ApiError` is reported as `[erro] ...` on stderr with exit code 2.

use std::process::ExitCode;

use belenios_bootstrap::{cli::Cli, commands, telemetry};
use clap::Parser;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = telemetry::init(cli.global.log_level) {
        eprintln!("[warn] {err:#}");
    }

    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[erro] {err}");
            ExitCode::from(2)
        }
    }
}
