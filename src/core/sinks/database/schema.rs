//! Table schema for the relational sink

use super::mapping::{ColumnKind, ColumnMapping};
use sea_orm::sea_query::{Alias, ColumnDef, Table, TableCreateStatement};

/// Fixed, non-property columns
pub const ID: &str = "Id";
pub const MESSAGE: &str = "Message";
pub const MESSAGE_TEMPLATE: &str = "MessageTemplate";
pub const LEVEL: &str = "Level";
pub const TIMESTAMP: &str = "TimeStamp";
pub const EXCEPTION: &str = "Exception";
pub const PROPERTIES: &str = "Properties";

/// `CREATE TABLE IF NOT EXISTS` for the log table
pub fn create_table_statement(table: &str, mapping: &ColumnMapping) -> TableCreateStatement {
    let mut statement = Table::create();
    statement
        .table(Alias::new(table))
        .if_not_exists()
        .col(
            ColumnDef::new(Alias::new(ID))
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Alias::new(MESSAGE)).text().null())
        .col(ColumnDef::new(Alias::new(MESSAGE_TEMPLATE)).text().null())
        .col(ColumnDef::new(Alias::new(LEVEL)).string_len(16).null())
        .col(
            ColumnDef::new(Alias::new(TIMESTAMP))
                .timestamp_with_time_zone()
                .null(),
        )
        .col(ColumnDef::new(Alias::new(EXCEPTION)).text().null())
        .col(ColumnDef::new(Alias::new(PROPERTIES)).text().null());

    for column in mapping.columns() {
        let mut def = ColumnDef::new(Alias::new(column.name.as_str()));
        match column.kind {
            ColumnKind::Text { max_len } => def.string_len(max_len as u32),
            ColumnKind::Integer => def.big_integer(),
        };
        statement.col(def.null());
    }

    statement
}
