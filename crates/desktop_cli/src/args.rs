//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "desktop_cli")]
#[command(about = "Drive the simulated desktop's filesystem and window manager from a terminal")]
/// Command-line flags for `desktop_cli`.
pub struct CliArgs {
    /// TOML config file; defaults apply when absent.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the `system.desktop.json` snapshot. Without it nothing is persisted.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Ignore any saved snapshot and boot the seed desktop.
    #[arg(long)]
    pub fresh: bool,
}
