mod check;
mod dump;

pub use check::*;
use clap::Subcommand;
pub use dump::*;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Path to config file
        #[arg(default_value = "testread.toml")]
        path: PathBuf,

        /// Print errors without diagnostics formatting
        #[arg(short, long, default_value = "false")]
        plain: bool,
    },

    /// Print resolved configuration
    Dump {
        #[arg(default_value = "testread.toml")]
        path: PathBuf,

        /// Output as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}
