//! PostgreSQL engine implementation

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgColumn, PgConnectOptions, PgConnection, PgRow};
use sqlx::{Column, Connection, Row};
use tributary_core::{DatabaseConfig, SchemaDescription, TableSchema, TributaryError};
use tributary_types::{Engine, ResultSet};
use tracing::{debug, warn};

use super::traits::SqlEngine;
use super::value::{decimal_value, float_value};

const TABLES_SQL: &str = "SELECT table_name::text FROM information_schema.tables \
     WHERE table_schema = 'public' AND table_type = 'BASE TABLE' \
     ORDER BY table_name";

const COLUMNS_SQL: &str = "SELECT column_name::text, data_type::text FROM information_schema.columns \
     WHERE table_schema = 'public' AND table_name = $1 \
     ORDER BY ordinal_position";

const PRIMARY_KEY_SQL: &str = "SELECT kcu.column_name::text \
     FROM information_schema.table_constraints tc \
     JOIN information_schema.key_column_usage kcu \
       ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
     WHERE tc.constraint_type = 'PRIMARY KEY' AND tc.table_schema = 'public' AND tc.table_name = $1 \
     ORDER BY kcu.ordinal_position";

const FOREIGN_KEYS_SQL: &str = "SELECT kcu.column_name::text, ccu.table_name::text, ccu.column_name::text \
     FROM information_schema.table_constraints tc \
     JOIN information_schema.key_column_usage kcu \
       ON tc.constraint_name = kcu.constraint_name AND tc.table_schema = kcu.table_schema \
     JOIN information_schema.constraint_column_usage ccu \
       ON ccu.constraint_name = tc.constraint_name AND ccu.table_schema = tc.table_schema \
     WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_schema = 'public' AND tc.table_name = $1 \
     ORDER BY kcu.column_name";

/// PostgreSQL engine
pub struct PostgresEngine {
    options: PgConnectOptions,
}

impl PostgresEngine {
    /// Create an engine from branch configuration; no connection is opened yet
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port())
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        Self { options }
    }

    async fn connect(&self) -> Result<PgConnection, TributaryError> {
        PgConnection::connect_with(&self.options)
            .await
            .map_err(|e| TributaryError::Database(format!("PostgreSQL connection failed: {}", e)))
    }

    async fn close(conn: PgConnection) {
        if let Err(e) = conn.close().await {
            warn!("Failed to close PostgreSQL connection: {}", e);
        }
    }

    async fn load_tables(conn: &mut PgConnection) -> Result<Vec<TableSchema>, sqlx::Error> {
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

    /// Convert a PostgreSQL row to a JSON-compatible map
    fn row_to_map(row: &PgRow) -> tributary_types::Row {
        row.columns()
            .iter()
            .map(|column| (column.name().to_string(), Self::get_column_value(row, column)))
            .collect()
    }

    /// Get a column value as a JSON value
    fn get_column_value(row: &PgRow, column: &PgColumn) -> Value {
        use sqlx::TypeInfo;

        let type_name = column.type_info().name();
        let idx = column.ordinal();

        match type_name {
            "BOOL" => row
                .try_get::<Option<bool>, _>(idx)
                .ok()
                .flatten()
                .map(Value::Bool)
                .unwrap_or(Value::Null),
            "INT2" => row
                .try_get::<Option<i16>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::Number(v.into()))
                .unwrap_or(Value::Null),
            "INT4" => row
                .try_get::<Option<i32>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::Number(v.into()))
                .unwrap_or(Value::Null),
            "INT8" => row
                .try_get::<Option<i64>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::Number(v.into()))
                .unwrap_or(Value::Null),
            "FLOAT4" => row
                .try_get::<Option<f32>, _>(idx)
                .ok()
                .flatten()
                .map(|v| float_value(v as f64))
                .unwrap_or(Value::Null),
            "FLOAT8" => row
                .try_get::<Option<f64>, _>(idx)
                .ok()
                .flatten()
                .map(float_value)
                .unwrap_or(Value::Null),
            "NUMERIC" => row
                .try_get::<Option<bigdecimal::BigDecimal>, _>(idx)
                .ok()
                .flatten()
                .map(decimal_value)
                .unwrap_or(Value::Null),
            "UUID" => row
                .try_get::<Option<uuid::Uuid>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::String(v.to_string()))
                .unwrap_or(Value::Null),
            "TIMESTAMPTZ" => row
                .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::String(v.to_rfc3339()))
                .unwrap_or(Value::Null),
            "TIMESTAMP" => row
                .try_get::<Option<chrono::NaiveDateTime>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::String(v.to_string()))
                .unwrap_or(Value::Null),
            "DATE" => row
                .try_get::<Option<chrono::NaiveDate>, _>(idx)
                .ok()
                .flatten()
                .map(|v| Value::String(v.to_string()))
                .unwrap_or(Value::Null),
            "JSON" | "JSONB" => row
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
impl SqlEngine for PostgresEngine {
    async fn describe_schema(&self) -> Result<SchemaDescription, TributaryError> {
        let mut conn = self
            .connect()
            .await
            .map_err(|e| TributaryError::Introspection(e.to_string()))?;
        let result = Self::load_tables(&mut conn).await;
        Self::close(conn).await;

        let tables = result.map_err(|e| {
            TributaryError::Introspection(format!("PostgreSQL catalog query failed: {}", e))
        })?;
        debug!("Introspected {} PostgreSQL tables", tables.len());
        Ok(SchemaDescription::from_tables(&tables))
    }

    async fn execute(&self, statement: &str) -> Result<ResultSet, TributaryError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(statement).fetch_all(&mut conn).await;
        Self::close(conn).await;

        let rows = result.map_err(|e| {
            TributaryError::QueryExecution(format!("PostgreSQL query failed: {}", e))
        })?;
        Ok(rows.iter().map(Self::row_to_map).collect())
    }

    async fn health_check(&self) -> Result<(), TributaryError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("SELECT 1").fetch_one(&mut conn).await;
        Self::close(conn).await;

        result.map_err(|e| {
            TributaryError::Database(format!("PostgreSQL health check failed: {}", e))
        })?;
        Ok(())
    }

    fn engine(&self) -> Engine {
        Engine::Postgres
    }
}
