//! Core schema definition types.
//!
//! Declarative descriptions of every PostgreSQL object the bootstrap creates.
//! Values are built in `const` context so the whole schema lives in statics.

use serde::Serialize;

/// Column data type as written in DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Uuid,
    Text,
    Integer,
    Boolean,
    Timestamptz,
    Jsonb,
    /// A user-defined enumerated type, referenced by name.
    Enum(&'static str),
}

impl ColumnType {
    /// Returns the PostgreSQL type name.
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Uuid => "UUID",
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Timestamptz => "TIMESTAMPTZ",
            ColumnType::Jsonb => "JSONB",
            ColumnType::Enum(name) => *name,
        }
    }
}

/// Referential action taken when the referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    Cascade,
    SetNull,
    Restrict,
}

impl OnDelete {
    pub fn sql(&self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
            OnDelete::SetNull => "SET NULL",
            OnDelete::Restrict => "RESTRICT",
        }
    }

    /// The value PostgreSQL reports in `information_schema.referential_constraints.delete_rule`.
    pub fn delete_rule(&self) -> &'static str {
        self.sql()
    }
}

/// A column-level foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
    pub on_delete: OnDelete,
}

/// A single table column.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub not_null: bool,
    pub primary_key: bool,
    pub unique: bool,
    /// Raw SQL default expression (e.g. `now()`, `'open'`).
    pub default: Option<&'static str>,
    /// Raw SQL check expression.
    pub check: Option<&'static str>,
    pub references: Option<ForeignKey>,
}

impl Column {
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            not_null: false,
            primary_key: false,
            unique: false,
            default: None,
            check: None,
            references: None,
        }
    }

    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Primary key columns are implicitly NOT NULL.
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.not_null = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn default_to(mut self, expr: &'static str) -> Self {
        self.default = Some(expr);
        self
    }

    pub const fn check(mut self, expr: &'static str) -> Self {
        self.check = Some(expr);
        self
    }

    pub const fn references(
        mut self,
        table: &'static str,
        column: &'static str,
        on_delete: OnDelete,
    ) -> Self {
        self.references = Some(ForeignKey {
            table,
            column,
            on_delete,
        });
        self
    }
}

/// A user-defined enumerated type (`CREATE TYPE ... AS ENUM`).
#[derive(Debug, Clone, Copy)]
pub struct EnumType {
    pub name: &'static str,
    pub labels: &'static [&'static str],
}

/// A PL/pgSQL function returning `TRIGGER`.
#[derive(Debug, Clone, Copy)]
pub struct TriggerFunction {
    pub name: &'static str,
    /// Statements placed between `BEGIN` and `END`.
    pub body: &'static str,
}

/// A secondary index, optionally unique and/or partial.
#[derive(Debug, Clone, Copy)]
pub struct Index {
    pub name: &'static str,
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub unique: bool,
    /// `WHERE` predicate of a partial index.
    pub predicate: Option<&'static str>,
}

/// A `BEFORE UPDATE` row trigger bound to a table.
#[derive(Debug, Clone, Copy)]
pub struct UpdateTrigger {
    pub name: &'static str,
    pub function: &'static str,
}

/// A complete table definition.
#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    /// Composite primary key. Empty when the key is declared on a column.
    pub primary_key: &'static [&'static str],
    /// Table-level `UNIQUE (...)` column sets.
    pub unique: &'static [&'static [&'static str]],
    pub indexes: &'static [Index],
    pub update_trigger: Option<UpdateTrigger>,
}

impl Table {
    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns `(column, foreign key)` pairs for every referencing column.
    pub fn foreign_keys(&self) -> impl Iterator<Item = (&Column, &ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|c| c.references.as_ref().map(|fk| (c, fk)))
    }

    /// Names of every table this one references, deduplicated, in column order.
    pub fn referenced_tables(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        for (_, fk) in self.foreign_keys() {
            if fk.table != self.name && !names.contains(&fk.table) {
                names.push(fk.table);
            }
        }
        names
    }

    /// Returns the primary key column names, whether composite or column-level.
    pub fn primary_key_columns(&self) -> Vec<&'static str> {
        if !self.primary_key.is_empty() {
            return self.primary_key.to_vec();
        }
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name)
            .collect()
    }
}

/// Category of a creatable schema object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Type,
    Function,
    Table,
    Index,
    Trigger,
}

impl ObjectKind {
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Type => "type",
            ObjectKind::Function => "function",
            ObjectKind::Table => "table",
            ObjectKind::Index => "index",
            ObjectKind::Trigger => "trigger",
        }
    }
}

/// One creatable object in the bootstrap plan.
#[derive(Debug, Clone, Copy)]
pub enum SchemaObject {
    Enum(&'static EnumType),
    Function(&'static TriggerFunction),
    Table(&'static Table),
    Index(&'static Index),
    Trigger {
        table: &'static Table,
        trigger: &'static UpdateTrigger,
    },
}

impl SchemaObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            SchemaObject::Enum(_) => ObjectKind::Type,
            SchemaObject::Function(_) => ObjectKind::Function,
            SchemaObject::Table(_) => ObjectKind::Table,
            SchemaObject::Index(_) => ObjectKind::Index,
            SchemaObject::Trigger { .. } => ObjectKind::Trigger,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SchemaObject::Enum(e) => e.name,
            SchemaObject::Function(f) => f.name,
            SchemaObject::Table(t) => t.name,
            SchemaObject::Index(i) => i.name,
            SchemaObject::Trigger { trigger, .. } => trigger.name,
        }
    }

    /// The table an index or trigger is attached to.
    pub fn table(&self) -> Option<&'static str> {
        match self {
            SchemaObject::Index(i) => Some(i.table),
            SchemaObject::Trigger { table, .. } => Some(table.name),
            SchemaObject::Table(t) => Some(t.name),
            _ => None,
        }
    }

    /// Human-readable identifier, e.g. `trigger users_set_updated_at`.
    pub fn describe(&self) -> String {
        format!("{} {}", self.kind().label(), self.name())
    }
}
