//! Output formatting for setup command results.

use crate::commands::setup::execute::SetupResult;
use crate::db::schema::{LedgerState, ObjectState};
use crate::output::Outputable;

/// Symbol and label for an object state.
fn state_marker(state: ObjectState) -> (&'static str, &'static str) {
    match state {
        ObjectState::Created => ("✓", "created"),
        ObjectState::AlreadyExists => ("✓", "exists"),
        ObjectState::WouldCreate => ("→", "would create"),
    }
}

impl Outputable for SetupResult {
    fn to_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Database Setup: {}\n", self.database));

        for migration in &self.migrations {
            output.push('\n');
            if self.dry_run {
                output.push_str(&format!("{} (dry-run):\n", migration.version));
            } else {
                output.push_str(&format!("{}:\n", migration.version));
            }

            for object in &migration.objects {
                let (symbol, status_text) = state_marker(object.state);
                let name = match &object.table {
                    Some(table) => format!("{} {} on {}", object.kind.label(), object.name, table),
                    None => format!("{} {}", object.kind.label(), object.name),
                };
                output.push_str(&format!("  {} {} ({})\n", symbol, name, status_text));
            }

            let ledger_text = match migration.ledger {
                LedgerState::Recorded => "recorded",
                LedgerState::AlreadyRecorded => "already recorded",
                LedgerState::WouldRecord => "would record",
            };
            output.push_str(&format!("  ledger: {}\n", ledger_text));
        }

        if self.dry_run {
            output.push_str(&format!(
                "\n{} to create. No changes made (dry-run mode).\n",
                self.count(ObjectState::WouldCreate)
            ));
        } else if self.created_new {
            output.push_str(&format!(
                "\nCreated {}, {} already present. Database ready.\n",
                self.count(ObjectState::Created),
                self.count(ObjectState::AlreadyExists)
            ));
        } else {
            output.push_str("\nDatabase already configured.\n");
        }

        output
    }
}
