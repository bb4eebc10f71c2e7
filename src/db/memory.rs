//! In-process backend with a simulated catalog.
//!
//! Records every statement it "executes" and tracks created objects by kind
//! and name, so runs are observable without a PostgreSQL server.

use std::collections::HashSet;
use std::error::Error;
use std::sync::Mutex;

use super::backend::{AppliedMigration, DatabaseBackend};
use super::schema::{ObjectKind, PostgresCompiler, SchemaObject};
use super::DbError;

#[derive(Debug, Default)]
struct MemoryState {
    objects: HashSet<(ObjectKind, String)>,
    statements: Vec<String>,
    ledger: Vec<String>,
    /// Names held by relations outside the plan, such as a view.
    foreign_relations: HashSet<String>,
    creates: usize,
    fail_at: Option<usize>,
}

/// Backend that keeps its catalog in memory.
#[derive(Debug)]
pub struct MemoryBackend {
    database: String,
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Make the `n`th object creation (1-based) fail.
    pub fn failing_at(self, n: usize) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.fail_at = Some(n);
        }
        self
    }

    /// Occupy a relation name with something other than a table or index, so
    /// `IF NOT EXISTS` statements for that name succeed without creating it.
    pub fn with_foreign_relation(self, name: &str) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.foreign_relations.insert(name.to_string());
        }
        self
    }

    /// Stop injecting failures.
    pub fn clear_failure(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.fail_at = None;
        }
    }

    /// Statements executed successfully, in order.
    pub fn statements(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|s| s.statements.clone())
            .unwrap_or_default()
    }

    /// Forget an object, as if it had been dropped out of band.
    pub fn drop_object(&self, kind: ObjectKind, name: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.objects.remove(&(kind, name.to_string()));
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, DbError> {
        self.state.lock().map_err(|_| DbError::LockPoisoned)
    }
}

impl DatabaseBackend for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "Memory"
    }

    fn database_name(&self) -> &str {
        &self.database
    }

    fn object_exists(&self, object: &SchemaObject) -> Result<bool, Box<dyn Error>> {
        let state = self.lock()?;
        Ok(state
            .objects
            .contains(&(object.kind(), object.name().to_string())))
    }

    fn create_object(&self, object: &SchemaObject) -> Result<(), Box<dyn Error>> {
        let mut state = self.lock()?;
        state.creates += 1;

        if state.fail_at == Some(state.creates) {
            return Err(Box::new(DbError::StatementFailed {
                object: object.describe(),
                message: "injected failure".to_string(),
            }));
        }

        state.statements.push(PostgresCompiler::compile_object(object));

        let is_relation = matches!(object.kind(), ObjectKind::Table | ObjectKind::Index);
        if is_relation && state.foreign_relations.contains(object.name()) {
            return Ok(());
        }

        state
            .objects
            .insert((object.kind(), object.name().to_string()));
        Ok(())
    }

    fn record_migration(&self, version: &str) -> Result<bool, Box<dyn Error>> {
        let mut state = self.lock()?;

        if !state
            .objects
            .contains(&(ObjectKind::Table, "schema_migrations".to_string()))
        {
            return Err(Box::new(DbError::LedgerFailed {
                version: version.to_string(),
                message: "relation \"schema_migrations\" does not exist".to_string(),
            }));
        }

        if state.ledger.iter().any(|v| v == version) {
            return Ok(false);
        }
        state.ledger.push(version.to_string());
        Ok(true)
    }

    fn applied_migrations(&self) -> Result<Vec<AppliedMigration>, Box<dyn Error>> {
        let state = self.lock()?;
        let mut versions = state.ledger.clone();
        versions.sort();
        Ok(versions
            .into_iter()
            .map(|version| AppliedMigration {
                version,
                applied_at: "memory".to_string(),
            })
            .collect())
    }
}
