//! strategy_schema library - Schema bootstrap for the strategy game database
//!
//! Provides the declarative schema, the DDL compiler, the migration runner,
//! database backends, command execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod output;

#[macro_use]
pub mod test_macros;
