//! Relational-store sink
//!
//! Writes one row per event into a table with fixed, typed property columns
//! and a JSON overflow column for everything else. The table is created at
//! startup when missing; field-set changes never migrate it.

mod mapping;
mod schema;


pub use mapping::{ColumnKind, ColumnMapping, ColumnSpec, ColumnValue, MappedRow, truncate};

use super::Sink;
use crate::config::DatabaseSinkConfig;
use crate::core::context::{PropertyBag, PropertyValue};
use crate::core::event::LogEvent;
use crate::utils::error::{PipelineError, Result, RetryConfig, RetryPolicy};
use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Expr, Order, Query, SimpleExpr};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, QueryResult};
use std::time::Duration;
use tracing::{debug, info};

/// Row read back from the log table
#[derive(Debug, Clone, PartialEq)]
pub struct StoredLogRow {
    pub id: i32,
    pub message: Option<String>,
    pub message_template: Option<String>,
    pub level: Option<String>,
    pub exception: Option<String>,
    /// Non-null mapped columns
    pub columns: PropertyBag,
    /// Decoded overflow blob
    pub overflow: PropertyBag,
}

impl StoredLogRow {
    /// Look a property up in the mapped columns, then in the overflow blob
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.columns.get(name).or_else(|| self.overflow.get(name))
    }
}

/// Sink writing events to a relational table
pub struct DatabaseSink {
    db: DatabaseConnection,
    table: String,
    mapping: ColumnMapping,
    retry: RetryPolicy,
}

impl DatabaseSink {
    /// Connect and, if configured, provision the table
    pub async fn connect(config: &DatabaseSinkConfig) -> Result<Self> {
        let db = Self::try_connect(config).await?;
        let sink = Self::from_connection(db, config);
        if config.auto_create_table {
            sink.ensure_table().await?;
        }
        info!(table = %sink.table, "Database sink ready");
        Ok(sink)
    }

    /// Wrap an existing connection
    pub fn from_connection(db: DatabaseConnection, config: &DatabaseSinkConfig) -> Self {
        Self {
            db,
            table: config.table.clone(),
            mapping: ColumnMapping::standard(&config.column_limits),
            retry: RetryPolicy::new(RetryConfig::from_retries(
                config.max_retries,
                config.retry_backoff_ms,
            )),
        }
    }

    async fn try_connect(config: &DatabaseSinkConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(config.url.clone());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connection_timeout))
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        // An in-memory SQLite database lives only as long as its connection
        if !config.url.contains(":memory:") {
            opt.idle_timeout(Duration::from_secs(600))
                .max_lifetime(Duration::from_secs(3600));
        }

        Database::connect(opt).await.map_err(PipelineError::Database)
    }

    /// Create the log table if it does not exist
    pub async fn ensure_table(&self) -> Result<()> {
        let backend = self.db.get_database_backend();
        let statement = schema::create_table_statement(&self.table, &self.mapping);
        self.db.execute(backend.build(&statement)).await?;
        debug!(table = %self.table, "Log table ensured");
        Ok(())
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Insert one mapped row
    pub async fn insert_row(&self, row: &MappedRow) -> Result<()> {
        let mut columns = vec![
            Alias::new(schema::MESSAGE),
            Alias::new(schema::MESSAGE_TEMPLATE),
            Alias::new(schema::LEVEL),
            Alias::new(schema::TIMESTAMP),
            Alias::new(schema::EXCEPTION),
            Alias::new(schema::PROPERTIES),
        ];
        let mut values: Vec<SimpleExpr> = vec![
            row.message.clone().into(),
            row.message_template.clone().into(),
            row.level.clone().into(),
            row.timestamp.into(),
            row.exception.clone().into(),
            row.overflow_json()?.into(),
        ];

        for (name, value) in &row.columns {
            let kind = self.mapping.column(name).map(|c| c.kind);
            columns.push(Alias::new(name.as_str()));
            values.push(match (value, kind) {
                (Some(ColumnValue::Text(s)), _) => Expr::value(s.clone()),
                (Some(ColumnValue::Integer(i)), _) => Expr::value(*i),
                (None, Some(ColumnKind::Integer)) => Expr::value(Option::<i64>::None),
                (None, _) => Expr::value(Option::<String>::None),
            });
        }

        let mut insert = Query::insert();
        insert
            .into_table(Alias::new(self.table.as_str()))
            .columns(columns)
            .values(values)
            .map_err(|e| PipelineError::sink_write("database", e.to_string()))?;

        let backend = self.db.get_database_backend();
        self.db.execute(backend.build(&insert)).await?;
        Ok(())
    }

    /// Most recent rows, newest first
    pub async fn fetch_recent(&self, limit: u64) -> Result<Vec<StoredLogRow>> {
        let mut select = Query::select();
        select
            .column(Alias::new(schema::ID))
            .column(Alias::new(schema::MESSAGE))
            .column(Alias::new(schema::MESSAGE_TEMPLATE))
            .column(Alias::new(schema::LEVEL))
            .column(Alias::new(schema::EXCEPTION))
            .column(Alias::new(schema::PROPERTIES));
        for column in self.mapping.columns() {
            select.column(Alias::new(column.name.as_str()));
        }
        select
            .from(Alias::new(self.table.as_str()))
            .order_by(Alias::new(schema::ID), Order::Desc)
            .limit(limit);

        let backend = self.db.get_database_backend();
        let rows = self.db.query_all(backend.build(&select)).await?;
        rows.iter().map(|row| self.decode_row(row)).collect()
    }

    fn decode_row(&self, row: &QueryResult) -> Result<StoredLogRow> {
        let mut columns = PropertyBag::new();
        for column in self.mapping.columns() {
            match column.kind {
                ColumnKind::Text { .. } => {
                    if let Some(value) = row.try_get::<Option<String>>("", &column.name)? {
                        columns.insert(column.name.clone(), value);
                    }
                }
                ColumnKind::Integer => {
                    if let Some(value) = row.try_get::<Option<i64>>("", &column.name)? {
                        columns.insert(column.name.clone(), value);
                    }
                }
            }
        }

        let overflow = match row.try_get::<Option<String>>("", schema::PROPERTIES)? {
            Some(text) => PropertyBag::from_typed_str(&text)?,
            None => PropertyBag::new(),
        };

        Ok(StoredLogRow {
            id: row.try_get("", schema::ID)?,
            message: row.try_get("", schema::MESSAGE)?,
            message_template: row.try_get("", schema::MESSAGE_TEMPLATE)?,
            level: row.try_get("", schema::LEVEL)?,
            exception: row.try_get("", schema::EXCEPTION)?,
            columns,
            overflow,
        })
    }

    /// Close the connection pool
    pub async fn close(self) -> Result<()> {
        self.db.close().await?;
        Ok(())
    }
}

#[async_trait]
impl Sink for DatabaseSink {
    fn name(&self) -> &str {
        "database"
    }

    async fn write(&self, event: &LogEvent) -> Result<()> {
        let row = self.mapping.map(event);
        self.insert_row(&row).await
    }

    fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone()
    }
}
