//! Interactive command-line host for the simulated desktop.
//!
//! Boots a [`desktop_runtime::DesktopStore`] (from a JSON snapshot directory when one is given),
//! opens a terminal window and feeds stdin lines to it. Lines starting with `:` drive the window
//! manager directly; see [`shell::DesktopShell`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod args;
pub mod shell;

use std::io::{BufRead, Write};

use thiserror::Error;

pub use args::CliArgs;
pub use shell::{DesktopShell, Flow};

#[derive(Debug, Error)]
/// Failures that end the CLI.
pub enum CliError {
    /// The config file could not be loaded.
    #[error(transparent)]
    Config(#[from] desktop_runtime::ConfigError),
    /// The snapshot could not be saved on exit.
    #[error(transparent)]
    Persistence(#[from] desktop_runtime::PersistenceError),
    /// Reading stdin or writing stdout failed.
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs the read-eval-print loop until end of input or `:quit`.
///
/// # Errors
///
/// Returns [`CliError`] when the config cannot be loaded, stdio fails, or the final snapshot
/// save fails.
pub fn run(args: &CliArgs, input: impl BufRead, mut output: impl Write) -> Result<(), CliError> {
    let mut shell = DesktopShell::boot(args)?;
    write!(output, "{}", shell.banner())?;

    let mut lines = input.lines();
    loop {
        write!(output, "{}", shell.prompt())?;
        output.flush()?;
        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let (printed, flow) = shell.handle_line(&line?);
        for text in printed {
            writeln!(output, "{text}")?;
        }
        if flow == Flow::Exit {
            break;
        }
    }
    shell.shutdown()?;
    Ok(())
}
