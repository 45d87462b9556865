//! Operator CLI for samwise job declarations.
//!
//! Validates ecosystem files at the operator's desk, before the external
//! process manager loads them at startup.

mod cli;
mod commands;

pub use cli::{Cli, Commands};
pub use commands::{check, init_logging, show};
