//! Sink configuration validators

use super::trait_def::Validate;
use crate::config::models::*;

impl Validate for SinkConfig {
    fn validate(&self) -> Result<(), String> {
        match self {
            Self::Console(_) => Ok(()),
            Self::Database(db) => db.validate(),
        }
    }
}

impl Validate for DatabaseSinkConfig {
    fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }

        let supported = ["sqlite:", "postgres://", "postgresql://"];
        if !supported.iter().any(|scheme| self.url.starts_with(scheme)) {
            return Err(format!(
                "Unsupported database URL scheme in '{}'; expected sqlite or postgres",
                self.url
            ));
        }

        if !is_identifier(&self.table) {
            return Err(format!("Invalid table name: '{}'", self.table));
        }

        if self.max_connections == 0 {
            return Err("Max connections must be greater than 0".to_string());
        }

        self.column_limits.validate()
    }
}

impl Validate for ColumnLimits {
    fn validate(&self) -> Result<(), String> {
        for (column, limit) in self.entries() {
            if limit == 0 {
                return Err(format!("Column limit for {} must be greater than 0", column));
            }
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
