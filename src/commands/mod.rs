//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - `execute.rs` producing a serializable result
//! - `output.rs` rendering that result as a table

mod setup;
mod sql;
mod status;

pub use setup::SetupCmd;
pub use sql::SqlCmd;
pub use status::StatusCmd;

use clap::Subcommand;
use enum_dispatch::enum_dispatch;
use std::error::Error;

use crate::db::{DatabaseBackend, DatabaseConfig};
use crate::output::{OutputFormat, Outputable};

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, db: &dyn DatabaseBackend) -> Result<Self::Output, Box<dyn Error>>;
}

/// Trait for running a command end to end: connect if needed, execute, format.
#[enum_dispatch]
pub trait CommandRunner {
    fn run(self, config: &DatabaseConfig, format: OutputFormat) -> Result<String, Box<dyn Error>>;
}

#[derive(Subcommand, Debug)]
#[enum_dispatch(CommandRunner)]
pub enum Command {
    /// Create the game schema; missing objects only, safe to re-run
    Setup(SetupCmd),

    /// Show applied migrations and any missing schema objects
    Status(StatusCmd),

    /// Print the full DDL script without connecting
    Sql(SqlCmd),
}
