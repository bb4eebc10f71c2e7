//! Catalog introspection queries.
//!
//! Each schema object kind maps to one existence query against the system
//! catalog, restricted to `current_schema()`.

use crate::db::schema::{ObjectKind, SchemaObject};

const TYPE_EXISTS: &str = "\
SELECT 1 FROM pg_type t
JOIN pg_namespace n ON n.oid = t.typnamespace
WHERE t.typname = $1 AND n.nspname = current_schema()";

const FUNCTION_EXISTS: &str = "\
SELECT 1 FROM pg_proc p
JOIN pg_namespace n ON n.oid = p.pronamespace
WHERE p.proname = $1 AND p.pronargs = 0 AND p.prorettype = 'trigger'::regtype
  AND n.nspname = current_schema()";

const TABLE_EXISTS: &str = "\
SELECT 1 FROM pg_class c
JOIN pg_namespace n ON n.oid = c.relnamespace
WHERE c.relname = $1 AND c.relkind IN ('r', 'p') AND n.nspname = current_schema()";

const INDEX_EXISTS: &str = "\
SELECT 1 FROM pg_class c
JOIN pg_namespace n ON n.oid = c.relnamespace
WHERE c.relname = $1 AND c.relkind = 'i' AND n.nspname = current_schema()";

const TRIGGER_EXISTS: &str = "\
SELECT 1 FROM pg_trigger t
JOIN pg_class c ON c.oid = t.tgrelid
JOIN pg_namespace n ON n.oid = c.relnamespace
WHERE t.tgname = $1 AND c.relname = $2 AND NOT t.tgisinternal AND n.nspname = current_schema()";

/// Query for the ledger rows, oldest version first.
pub const SELECT_LEDGER: &str =
    "SELECT version, applied_at::text FROM schema_migrations ORDER BY version";

/// Query inserting a ledger row; affects zero rows if already present.
pub const INSERT_LEDGER: &str =
    "INSERT INTO schema_migrations (version, applied_at) VALUES ($1, now()) ON CONFLICT (version) DO NOTHING";

/// An existence query plus its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistsQuery {
    pub sql: &'static str,
    pub params: Vec<&'static str>,
}

/// Build the existence query for an object.
pub fn exists_query(object: &SchemaObject) -> ExistsQuery {
    match object {
        SchemaObject::Trigger { table, trigger } => ExistsQuery {
            sql: TRIGGER_EXISTS,
            params: vec![trigger.name, table.name],
        },
        _ => ExistsQuery {
            sql: kind_query(object.kind()),
            params: vec![object.name()],
        },
    }
}

fn kind_query(kind: ObjectKind) -> &'static str {
    match kind {
        ObjectKind::Type => TYPE_EXISTS,
        ObjectKind::Function => FUNCTION_EXISTS,
        ObjectKind::Table => TABLE_EXISTS,
        ObjectKind::Index => INDEX_EXISTS,
        ObjectKind::Trigger => TRIGGER_EXISTS,
    }
}
