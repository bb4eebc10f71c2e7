//! Output formatting for status command results.

use crate::commands::status::execute::StatusResult;
use crate::output::Outputable;

impl Outputable for StatusResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Schema Status: {}", self.database));
        lines.push(String::new());

        lines.push("Applied migrations:".to_string());
        if self.applied.is_empty() {
            lines.push("  (none)".to_string());
        }
        for row in &self.applied {
            lines.push(format!("  ✓ {} ({})", row.version, row.applied_at));
        }
        for version in &self.unapplied {
            lines.push(format!("  ✗ {} (not applied)", version));
        }

        if !self.missing.is_empty() {
            lines.push(String::new());
            lines.push(format!("Missing objects ({}):", self.missing.len()));
            for object in &self.missing {
                lines.push(format!("  ✗ {} {}", object.kind.label(), object.name));
            }
        }

        lines.push(String::new());
        if self.up_to_date {
            lines.push("Schema is up to date.".to_string());
        } else {
            lines.push("Schema is incomplete. Run `strategy_schema setup`.".to_string());
        }

        lines.join("\n")
    }
}
