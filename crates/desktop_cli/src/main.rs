//! Binary entrypoint for the interactive desktop shell.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use desktop_cli::CliArgs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Logs go to stderr so terminal output on stdout stays clean.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let stdin = io::stdin();
    match desktop_cli::run(&args, stdin.lock(), io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("desktop_cli: {err}");
            ExitCode::FAILURE
        }
    }
}
