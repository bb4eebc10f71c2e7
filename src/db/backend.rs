//! Database backend trait for abstracting the target database.
//!
//! The migration runner only ever talks to a `DatabaseBackend`, so the same
//! plan can run against a live PostgreSQL server or the in-process
//! [`MemoryBackend`](super::MemoryBackend).

use std::error::Error;

use serde::Serialize;

use super::schema::SchemaObject;

/// A row of the `schema_migrations` ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub version: String,
    /// `applied_at` rendered as text by the database.
    pub applied_at: String,
}

/// Trait for backends the schema bootstrap can run against.
///
/// Every call is one synchronous round trip; nothing is batched or wrapped in
/// a shared transaction.
pub trait DatabaseBackend: Send + Sync {
    /// Get the backend name for logging/debugging.
    fn backend_name(&self) -> &'static str;

    /// Name of the target database.
    fn database_name(&self) -> &str;

    /// Check the catalog for an object with the same kind and name.
    fn object_exists(&self, object: &SchemaObject) -> Result<bool, Box<dyn Error>>;

    /// Create a single object. Fails if the statement fails.
    fn create_object(&self, object: &SchemaObject) -> Result<(), Box<dyn Error>>;

    /// Insert a ledger row for `version`.
    /// Returns true if inserted, false if it was already present.
    fn record_migration(&self, version: &str) -> Result<bool, Box<dyn Error>>;

    /// Ledger rows ordered by version. Empty if the ledger table is missing.
    fn applied_migrations(&self) -> Result<Vec<AppliedMigration>, Box<dyn Error>>;
}
