//! MySQL engine implementation

use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySqlColumn, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Row};
use tributary_core::{DatabaseConfig, SchemaDescription, TableSchema, TributaryError};
use tributary_types::{Engine, ResultSet};
use tracing::{debug, warn};

use super::traits::SqlEngine;
use super::value::{decimal_value, float_value};

// Catalog columns are cast to CHAR so they decode as strings on every server version
const TABLES_SQL: &str = "SELECT CAST(TABLE_NAME AS CHAR) FROM information_schema.TABLES \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
     ORDER BY TABLE_NAME";

const COLUMNS_SQL: &str = "SELECT CAST(COLUMN_NAME AS CHAR), CAST(COLUMN_TYPE AS CHAR) \
     FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
     ORDER BY ORDINAL_POSITION";

const PRIMARY_KEY_SQL: &str = "SELECT CAST(COLUMN_NAME AS CHAR) FROM information_schema.KEY_COLUMN_USAGE \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? AND CONSTRAINT_NAME = 'PRIMARY' \
     ORDER BY ORDINAL_POSITION";

const FOREIGN_KEYS_SQL: &str = "SELECT CAST(COLUMN_NAME AS CHAR), CAST(REFERENCED_TABLE_NAME AS CHAR), \
     CAST(REFERENCED_COLUMN_NAME AS CHAR) FROM information_schema.KEY_COLUMN_USAGE \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? AND REFERENCED_TABLE_NAME IS NOT NULL \
     ORDER BY COLUMN_NAME";

/// MySQL engine
pub struct MySqlEngine {
    options: MySqlConnectOptions,
}

impl MySqlEngine {
    /// Create an engine from branch configuration; no connection is opened yet
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port())
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        Self { options }
    }

    async fn connect(&self) -> Result<MySqlConnection, TributaryError> {
        MySqlConnection::connect_with(&self.options)
            .await
            .map_err(|e| TributaryError::Database(format!("MySQL connection failed: {}", e)))
    }

    async fn close(conn: MySqlConnection) {
        if let Err(e) = conn.close().await {
            warn!("Failed to close MySQL connection: {}", e);
        }
    }

    async fn load_tables(conn: &mut MySqlConnection) -> Result<Vec<TableSchema>, sqlx::Error> {
        let names: Vec<(String,)> = sqlx::query_as(TABLES_SQL).fetch_all(&mut *conn).await?;
        let mut tables = Vec::with_capacity(names.len());

        for (name,) in names {
            let mut table = TableSchema::new(&name);

            let columns: Vec<(String, String)> = sqlx::query_as(COLUMNS_SQL)
                .bind(&name)
                .fetch_all(&mut *conn)
                .await?;
            for (column, data_type) in columns {
                table = table.column(column, data_type);
            }

            let primary_key: Vec<(String,)> = sqlx::query_as(PRIMARY_KEY_SQL)
                .bind(&name)
                .fetch_all(&mut *conn)
                .await?;
            for (column,) in primary_key {
                table = table.primary_key(column);
            }

            let foreign_keys: Vec<(String, String, String)> = sqlx::query_as(FOREIGN_KEYS_SQL)
                .bind(&name)
                .fetch_all(&mut *conn)
                .await?;
            for (column, foreign_table, foreign_column) in foreign_keys {
                table = table.foreign_key(column, foreign_table, foreign_column);
            }

            tables.push(table);
        }

        Ok(tables)
    }

    /// Convert a MySQL row to a JSON-compatible map
    fn row_to_map(row: &MySqlRow) -> tributary_types::Row {
        row.columns()
            .iter()
            .map(|column| (column.name().to_string(), Self::get_column_value(row, column)))
            .collect()
    }

    /// Get a column value as a JSON value
    fn get_column_value(row: &MySqlRow, column: &MySqlColumn) -> Value {
        use sqlx::TypeInfo;

        let type_name = column.type_info().name();
        let idx = column.ordinal();

        match type_name {
            "BOOLEAN" => row
                .try_get::<Option<bool>, _>(idx)
                .ok()
                .flatten()
                .map(Value::Bool)
                .unwrap_or(Value::Null),
            "TINYINT" | "SMALLINT" | "INT" | "MEDIUMINT" | "BIGINT" => row
                .try_get::<Option<i64>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::Number(v.into()))
                .unwrap_or(Value::Null),
            "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "INT UNSIGNED" | "MEDIUMINT UNSIGNED"
            | "BIGINT UNSIGNED" => row
                .try_get::<Option<u64>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::Number(v.into()))
                .unwrap_or(Value::Null),
            "FLOAT" => row
                .try_get::<Option<f32>, _>(idx)
                .ok()
                .flatten()
                .map(|v| float_value(v as f64))
                .unwrap_or(Value::Null),
            "DOUBLE" => row
                .try_get::<Option<f64>, _>(idx)
                .ok()
                .flatten()
                .map(float_value)
                .unwrap_or(Value::Null),
            "DECIMAL" => row
                .try_get::<Option<bigdecimal::BigDecimal>, _>(idx)
                .ok()
                .flatten()
                .map(decimal_value)
                .unwrap_or(Value::Null),
            "DATETIME" | "TIMESTAMP" => row
                .try_get::<Option<chrono::NaiveDateTime>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::String(v.format("%Y-%m-%dT%H:%M:%S").to_string()))
                .unwrap_or(Value::Null),
            "DATE" => row
                .try_get::<Option<chrono::NaiveDate>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::String(v.to_string()))
                .unwrap_or(Value::Null),
            "JSON" => row
                .try_get::<Option<Value>, _>(idx)
                .ok()
                .flatten()
                .unwrap_or(Value::Null),
            _ => row
                .try_get::<Option<String>, _>(idx)
                .ok()
                .flatten()
                .map(Value::String)
                .unwrap_or(Value::Null),
        }
    }
}

#[async_trait]
impl SqlEngine for MySqlEngine {
    async fn describe_schema(&self) -> Result<SchemaDescription, TributaryError> {
        let mut conn = self
            .connect()
            .await
            .map_err(|e| TributaryError::Introspection(e.to_string()))?;
        let result = Self::load_tables(&mut conn).await;
        Self::close(conn).await;

        let tables = result.map_err(|e| {
            TributaryError::Introspection(format!("MySQL catalog query failed: {}", e))
        })?;
        debug!("Introspected {} MySQL tables", tables.len());
        Ok(SchemaDescription::from_tables(&tables))
    }

    async fn execute(&self, statement: &str) -> Result<ResultSet, TributaryError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(statement).fetch_all(&mut conn).await;
        Self::close(conn).await;

        let rows = result
            .map_err(|e| TributaryError::QueryExecution(format!("MySQL query failed: {}", e)))?;
        Ok(rows.iter().map(Self::row_to_map).collect())
    }

    async fn health_check(&self) -> Result<(), TributaryError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("SELECT 1").fetch_one(&mut conn).await;
        Self::close(conn).await;

        result.map_err(|e| TributaryError::Database(format!("MySQL health check failed: {}", e)))?;
        Ok(())
    }

    fn engine(&self) -> Engine {
        Engine::Mysql
    }
}
