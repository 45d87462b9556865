//! samwise-ctl
//!
//! Validate and inspect process-manager job declarations.
//!
//! # Usage
//!
//! ```bash
//! samwise-ctl check ecosystem.json
//! samwise-ctl show ecosystem.json [--json]
//! ```

use anyhow::Result;
use clap::Parser;

use samwise_ctl::{check, init_logging, show, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    match cli.command {
        Commands::Check { file } => check(&file)?,
        Commands::Show { file, json } => show(&file, json)?,
    }

    Ok(())
}
