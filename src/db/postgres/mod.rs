//! PostgreSQL backend implementation.
//!
//! Uses the synchronous `postgres` client. Every statement is sent on its own
//! in autocommit mode, so a failure leaves earlier objects committed.

mod catalog;

use std::error::Error;
use std::sync::{Mutex, MutexGuard};

use postgres::types::ToSql;
use postgres::{Client, NoTls};
use tracing::{debug, info};

use super::backend::{AppliedMigration, DatabaseBackend};
use super::config::PostgresConfig;
use super::schema::tables::SCHEMA_MIGRATIONS;
use super::schema::{PostgresCompiler, SchemaObject};
use super::DbError;

use catalog::exists_query;

/// Text of a driver error: the server's own report for database errors,
/// otherwise the error followed by each of its causes.
pub(super) fn driver_message(err: &postgres::Error) -> String {
    if let Some(db_error) = err.as_db_error() {
        return db_error.to_string();
    }

    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// PostgreSQL backend over a single connection.
pub struct PostgresBackend {
    /// Guarded so the backend can be shared through `&self`; access is serial.
    client: Mutex<Client>,
    database: String,
}

impl PostgresBackend {
    /// Connect to the configured server.
    ///
    /// # Errors
    /// Returns `DbError::ConnectFailed` with the driver's message if the
    /// server is unreachable or rejects the credentials.
    pub fn connect(config: &PostgresConfig) -> Result<Self, Box<dyn Error>> {
        let pg_config = config.to_pg_config()?;
        let client = pg_config.connect(NoTls).map_err(|e| DbError::ConnectFailed {
            target: config.display_target(),
            message: driver_message(&e),
        })?;

        info!(target_db = %config.display_target(), "connected");

        Ok(Self {
            client: Mutex::new(client),
            database: config.database.clone(),
        })
    }

    fn client(&self) -> Result<MutexGuard<'_, Client>, DbError> {
        self.client.lock().map_err(|_| DbError::LockPoisoned)
    }

    fn exists(client: &mut Client, object: &SchemaObject) -> Result<bool, DbError> {
        let query = exists_query(object);
        let params: Vec<&(dyn ToSql + Sync)> = query
            .params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect();

        let row = client
            .query_opt(query.sql, &params)
            .map_err(|e| DbError::CatalogQueryFailed {
                object: object.describe(),
                message: driver_message(&e),
            })?;
        Ok(row.is_some())
    }
}

impl DatabaseBackend for PostgresBackend {
    fn backend_name(&self) -> &'static str {
        "Postgres"
    }

    fn database_name(&self) -> &str {
        &self.database
    }

    fn object_exists(&self, object: &SchemaObject) -> Result<bool, Box<dyn Error>> {
        let mut client = self.client()?;
        Ok(Self::exists(&mut client, object)?)
    }

    fn create_object(&self, object: &SchemaObject) -> Result<(), Box<dyn Error>> {
        let sql = PostgresCompiler::compile_object(object);
        debug!(object = %object.describe(), %sql, "executing");

        let mut client = self.client()?;
        client
            .batch_execute(&sql)
            .map_err(|e| DbError::StatementFailed {
                object: object.describe(),
                message: driver_message(&e),
            })?;
        Ok(())
    }

    fn record_migration(&self, version: &str) -> Result<bool, Box<dyn Error>> {
        let mut client = self.client()?;
        let inserted = client
            .execute(catalog::INSERT_LEDGER, &[&version])
            .map_err(|e| DbError::LedgerFailed {
                version: version.to_string(),
                message: driver_message(&e),
            })?;
        Ok(inserted == 1)
    }

    fn applied_migrations(&self) -> Result<Vec<AppliedMigration>, Box<dyn Error>> {
        let mut client = self.client()?;

        if !Self::exists(&mut client, &SchemaObject::Table(&SCHEMA_MIGRATIONS))? {
            return Ok(Vec::new());
        }

        let rows = client
            .query(catalog::SELECT_LEDGER, &[])
            .map_err(|e| DbError::CatalogQueryFailed {
                object: SchemaObject::Table(&SCHEMA_MIGRATIONS).describe(),
                message: driver_message(&e),
            })?;

        let mut applied = Vec::with_capacity(rows.len());
        for row in rows {
            applied.push(AppliedMigration {
                version: row.try_get(0)?,
                applied_at: row.try_get(1)?,
            });
        }
        Ok(applied)
    }
}
