//! Database access for the schema bootstrap.
//!
//! This module provides the database abstraction layer:
//! - Backend selection (PostgreSQL, or an in-process catalog for tests)
//! - Catalog introspection and statement execution behind `DatabaseBackend`
//! - The declarative schema and its DDL compiler (`schema`)
//!
//! # Architecture
//!
//! The schema is declared once as static data. The migration runner walks it
//! in dependency order, asks the backend whether each object exists, and
//! creates the missing ones. Backends never see raw DDL from callers; they
//! compile each `SchemaObject` themselves.

mod backend;
mod config;
mod escape;
mod memory;
mod postgres;
pub mod schema;

pub use backend::{AppliedMigration, DatabaseBackend};
pub use config::{ConnectionOverrides, DatabaseConfig, PostgresConfig};
pub use escape::{escape_literal, quote_literal, quote_literal_list};
pub use memory::MemoryBackend;
pub use self::postgres::PostgresBackend;

use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to '{target}': {message}")]
    ConnectFailed { target: String, message: String },

    #[error("Failed to create {object}: {message}")]
    StatementFailed { object: String, message: String },

    #[error("Failed to create {object}: still missing after its statement ran; another object may already use the name")]
    StillMissing { object: String },

    #[error("Catalog lookup for {object} failed: {message}")]
    CatalogQueryFailed { object: String, message: String },

    #[error("Failed to record migration '{version}': {message}")]
    LedgerFailed { version: String, message: String },

    #[error("Database connection lock poisoned")]
    LockPoisoned,
}
