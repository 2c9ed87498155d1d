//! Property-to-column mapping for the relational sink

use crate::config::ColumnLimits;
use crate::core::context::{PropertyBag, PropertyValue};
use crate::core::event::{LogEvent, well_known};
use tracing::debug;

/// Type of a mapped column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// String column holding at most `max_len` characters
    Text { max_len: usize },
    /// 64-bit integer column
    Integer,
}

/// One named, typed column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

/// Value bound for one mapped column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(String),
    Integer(i64),
}

/// Fixed set of property columns. Built once at startup, never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: Vec<ColumnSpec>,
}

/// One event flattened into table columns
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub message: String,
    pub message_template: String,
    pub level: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub exception: Option<String>,
    /// Mapped columns, in column order; absent properties are `None`
    pub columns: Vec<(String, Option<ColumnValue>)>,
    /// Properties with no compatible column
    pub overflow: PropertyBag,
}

impl MappedRow {
    pub fn column(&self, name: &str) -> Option<&ColumnValue> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Overflow blob as JSON text; `None` when every property was mapped
    pub fn overflow_json(&self) -> crate::utils::error::Result<Option<String>> {
        if self.overflow.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::to_string(&self.overflow.typed())?))
    }
}

impl ColumnMapping {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// The standard property columns with the configured length limits
    pub fn standard(limits: &ColumnLimits) -> Self {
        let mut columns = limits
            .entries()
            .iter()
            .map(|(name, max_len)| ColumnSpec {
                name: name.to_string(),
                kind: ColumnKind::Text { max_len: *max_len },
            })
            .collect::<Vec<_>>();
        columns.push(ColumnSpec {
            name: well_known::EXECUTION_TIME_MS.to_string(),
            kind: ColumnKind::Integer,
        });
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Flatten an event. Properties with a same-named, type-compatible column
    /// fill it (strings truncated to the column length); everything else goes
    /// to the overflow bag.
    pub fn map(&self, event: &LogEvent) -> MappedRow {
        let mut columns = self
            .columns
            .iter()
            .map(|c| (c.name.clone(), None))
            .collect::<Vec<(String, Option<ColumnValue>)>>();
        let mut overflow = PropertyBag::new();

        for (name, value) in event.properties().iter() {
            let slot = self
                .columns
                .iter()
                .position(|c| c.name == name)
                .and_then(|index| {
                    convert(&self.columns[index], value).map(|converted| (index, converted))
                });

            match slot {
                Some((index, converted)) => columns[index].1 = Some(converted),
                None => {
                    overflow.insert(name, value.clone());
                }
            }
        }

        MappedRow {
            message: event.render_message(),
            message_template: event.message_template().to_string(),
            level: event.level().as_str().to_string(),
            timestamp: event.timestamp(),
            exception: event.exception().map(|e| e.to_string()),
            columns,
            overflow,
        }
    }
}

fn convert(column: &ColumnSpec, value: &PropertyValue) -> Option<ColumnValue> {
    match (column.kind, value) {
        (ColumnKind::Text { max_len }, PropertyValue::String(s)) => {
            Some(ColumnValue::Text(truncate(&column.name, s, max_len)))
        }
        (ColumnKind::Integer, PropertyValue::Integer(i)) => Some(ColumnValue::Integer(*i)),
        _ => None,
    }
}

/// Truncate to at most `max_len` characters, never splitting a character
pub fn truncate(column: &str, value: &str, max_len: usize) -> String {
    match value.char_indices().nth(max_len) {
        Some((byte_index, _)) => {
            debug!(column, max_len, "Truncating value for column");
            value[..byte_index].to_string()
        }
        None => value.to_string(),
    }
}
