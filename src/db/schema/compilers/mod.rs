//! Database schema compilers.
//!
//! Generates DDL from the declarative schema definitions.

pub mod postgres;

pub use self::postgres::PostgresCompiler;
