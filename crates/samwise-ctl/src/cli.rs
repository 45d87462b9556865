//! CLI argument parsing for samwise-ctl.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Samwise declaration checker
///
/// Validates ecosystem files before the process manager loads them.
#[derive(Parser, Debug)]
#[command(name = "samwise-ctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Operator commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate an ecosystem file and report the first error, if any
    Check {
        /// Path to the ecosystem file (.json or .toml)
        file: PathBuf,
    },

    /// List the declarations in an ecosystem file with next trigger times
    Show {
        /// Path to the ecosystem file (.json or .toml)
        file: PathBuf,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}
