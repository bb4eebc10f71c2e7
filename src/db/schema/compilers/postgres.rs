//! PostgreSQL DDL compiler.
//!
//! Generates self-guarding PostgreSQL DDL from the schema definitions. Every
//! statement is safe to re-run: tables and indexes use `IF NOT EXISTS`, types
//! and triggers are wrapped in a `DO` block that checks the catalog first, and
//! the trigger function uses `CREATE OR REPLACE`.

use crate::db::escape::{quote_literal, quote_literal_list};
use crate::db::schema::definition::{
    Column, EnumType, Index, SchemaObject, Table, TriggerFunction, UpdateTrigger,
};
use crate::db::schema::migrations::Migration;

/// Compiler for generating PostgreSQL DDL from schema definitions.
pub struct PostgresCompiler;

impl PostgresCompiler {
    /// Generate the guarded DDL for any schema object.
    pub fn compile_object(object: &SchemaObject) -> String {
        match object {
            SchemaObject::Enum(e) => Self::compile_enum(e),
            SchemaObject::Function(f) => Self::compile_function(f),
            SchemaObject::Table(t) => Self::compile_table(t),
            SchemaObject::Index(i) => Self::compile_index(i),
            SchemaObject::Trigger { table, trigger } => Self::compile_trigger(table, trigger),
        }
    }

    /// Generate `CREATE TYPE ... AS ENUM`, guarded on `pg_type` in the current schema.
    ///
    /// ```sql
    /// DO $$
    /// BEGIN
    ///     IF NOT EXISTS (SELECT 1 FROM pg_type WHERE typname = 'lobby_status' AND typnamespace = (SELECT oid FROM pg_namespace WHERE nspname = current_schema())) THEN
    ///         CREATE TYPE lobby_status AS ENUM ('open', 'in_game', 'closed');
    ///     END IF;
    /// END
    /// $$;
    /// ```
    pub fn compile_enum(enum_type: &EnumType) -> String {
        Self::guarded(
            &format!(
                "SELECT 1 FROM pg_type WHERE typname = {} AND typnamespace = (SELECT oid FROM pg_namespace WHERE nspname = current_schema())",
                quote_literal(enum_type.name)
            ),
            &format!(
                "CREATE TYPE {} AS ENUM ({});",
                enum_type.name,
                quote_literal_list(enum_type.labels)
            ),
        )
    }

    /// Generate the trigger function. `CREATE OR REPLACE` is already idempotent.
    pub fn compile_function(function: &TriggerFunction) -> String {
        format!(
            "CREATE OR REPLACE FUNCTION {}() RETURNS TRIGGER AS $fn$\nBEGIN\n    {}\nEND;\n$fn$ LANGUAGE plpgsql;",
            function.name, function.body
        )
    }

    /// Generate `CREATE TABLE IF NOT EXISTS` with inline column constraints
    /// followed by composite key and table-level unique constraints.
    pub fn compile_table(table: &Table) -> String {
        let mut lines: Vec<String> = table.columns.iter().map(Self::compile_column).collect();

        if !table.primary_key.is_empty() {
            lines.push(format!("PRIMARY KEY ({})", table.primary_key.join(", ")));
        }

        for set in table.unique {
            lines.push(format!("UNIQUE ({})", set.join(", ")));
        }

        let body = lines
            .iter()
            .map(|l| format!("    {}", l))
            .collect::<Vec<_>>()
            .join(",\n");

        format!("CREATE TABLE IF NOT EXISTS {} (\n{}\n);", table.name, body)
    }

    /// Generate a single column definition, e.g.
    /// `host_user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT`.
    pub fn compile_column(column: &Column) -> String {
        let mut parts = vec![column.name.to_string(), column.column_type.sql_type().to_string()];

        if column.primary_key {
            parts.push("PRIMARY KEY".to_string());
        } else if column.not_null {
            parts.push("NOT NULL".to_string());
        }

        if column.unique {
            parts.push("UNIQUE".to_string());
        }

        if let Some(default) = column.default {
            parts.push(format!("DEFAULT {}", default));
        }

        if let Some(check) = column.check {
            parts.push(format!("CHECK ({})", check));
        }

        if let Some(fk) = &column.references {
            parts.push(format!(
                "REFERENCES {}({}) ON DELETE {}",
                fk.table,
                fk.column,
                fk.on_delete.sql()
            ));
        }

        parts.join(" ")
    }

    /// Generate `CREATE [UNIQUE] INDEX IF NOT EXISTS`, with a `WHERE` clause
    /// for partial indexes.
    pub fn compile_index(index: &Index) -> String {
        let unique = if index.unique { "UNIQUE " } else { "" };
        let predicate = index
            .predicate
            .map(|p| format!(" WHERE {}", p))
            .unwrap_or_default();

        format!(
            "CREATE {}INDEX IF NOT EXISTS {} ON {} ({}){};",
            unique,
            index.name,
            index.table,
            index.columns.join(", "),
            predicate
        )
    }

    /// Generate a `BEFORE UPDATE` row trigger, guarded on `pg_trigger`.
    pub fn compile_trigger(table: &Table, trigger: &UpdateTrigger) -> String {
        Self::guarded(
            &format!(
                "SELECT 1 FROM pg_trigger WHERE tgname = {} AND tgrelid = {}::regclass",
                quote_literal(trigger.name),
                quote_literal(table.name)
            ),
            &format!(
                "CREATE TRIGGER {} BEFORE UPDATE ON {} FOR EACH ROW EXECUTE FUNCTION {}();",
                trigger.name, table.name, trigger.function
            ),
        )
    }

    /// Generate the ledger insert for a migration version. No-op if present.
    pub fn compile_ledger_insert(version: &str) -> String {
        format!(
            "INSERT INTO schema_migrations (version, applied_at) VALUES ({}, now()) ON CONFLICT (version) DO NOTHING;",
            quote_literal(version)
        )
    }

    /// Generate the complete bootstrap as one idempotent SQL script.
    pub fn compile_script(migrations: &[Migration]) -> String {
        let mut out = String::new();
        for migration in migrations {
            out.push_str(&format!("-- {}: {}\n\n", migration.version, migration.description));
            for object in migration.objects() {
                out.push_str(&Self::compile_object(&object));
                out.push_str("\n\n");
            }
            out.push_str(&Self::compile_ledger_insert(migration.version));
            out.push('\n');
        }
        out
    }

    fn guarded(condition: &str, statement: &str) -> String {
        format!(
            "DO $$\nBEGIN\n    IF NOT EXISTS ({}) THEN\n        {}\n    END IF;\nEND\n$$;",
            condition, statement
        )
    }
}
