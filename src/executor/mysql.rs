//! MySQL executor backed by a `sqlx` connection pool

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Number, Value};
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, MySqlPool, Row, TypeInfo};

use super::errors::{ExecutionError, ExecutionResult};
use super::executor::{BoxFuture, StatementExecutor};
use crate::config::DatabaseConfig;
use crate::query::GeneratedStatement;

fn default_port() -> u16 {
    3306
}

/// Connection parameters supplied by the caller of `/api/connect`
#[derive(Clone, Deserialize)]
pub struct ConnectionParams {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub database: String,
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

impl ConnectionParams {
    fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Executes statements on a pooled MySQL connection
pub struct MySqlExecutor {
    pool: MySqlPool,
    query_timeout: Duration,
}

impl MySqlExecutor {
    /// Open a pool and verify it with one connection
    pub async fn connect(
        params: &ConnectionParams,
        config: &DatabaseConfig,
    ) -> ExecutionResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .connect_with(params.connect_options())
            .await
            .map_err(|e| ExecutionError::Connect(e.to_string()))?;

        Ok(Self::from_pool(pool, config.query_timeout()))
    }

    pub fn from_pool(pool: MySqlPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn fetch(&self, statement: &GeneratedStatement) -> ExecutionResult<Vec<MySqlRow>> {
        let query = bind_values(sqlx::query::<MySql>(&statement.text), &statement.params);

        match tokio::time::timeout(self.query_timeout, query.fetch_all(&self.pool)).await {
            Ok(result) => result.map_err(ExecutionError::from),
            Err(_) => Err(ExecutionError::Timeout(self.query_timeout)),
        }
    }
}

impl StatementExecutor for MySqlExecutor {
    fn execute<'a>(
        &'a self,
        statement: &'a GeneratedStatement,
    ) -> BoxFuture<'a, ExecutionResult<Vec<Value>>> {
        Box::pin(async move {
            let rows = self.fetch(statement).await?;
            Ok(rows.iter().map(row_to_json).collect())
        })
    }

    fn list_tables(&self) -> BoxFuture<'_, ExecutionResult<Vec<String>>> {
        Box::pin(async move {
            let statement = GeneratedStatement::new("SHOW TABLES", Vec::new());
            let rows = self.fetch(&statement).await?;
            Ok(rows
                .iter()
                .filter_map(|row| decode_text(row, 0))
                .collect())
        })
    }

    fn table_columns<'a>(&'a self, table: &'a str) -> BoxFuture<'a, ExecutionResult<Vec<String>>> {
        Box::pin(async move {
            let statement = GeneratedStatement::new(
                "SELECT COLUMN_NAME FROM information_schema.COLUMNS \
                 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
                 ORDER BY ORDINAL_POSITION",
                vec![Value::String(table.to_string())],
            );
            let rows = self.fetch(&statement).await?;
            Ok(rows
                .iter()
                .filter_map(|row| decode_text(row, 0))
                .collect())
        })
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move { self.pool.close().await })
    }
}

/// Bind JSON literals in placeholder order
fn bind_values<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    values: &[Value],
) -> Query<'q, MySql, MySqlArguments> {
    for value in values {
        query = match value {
            Value::Null => query.bind(None::<String>),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    query.bind(i)
                } else if let Some(u) = n.as_u64() {
                    query.bind(u)
                } else if let Some(f) = n.as_f64() {
                    query.bind(f)
                } else {
                    query.bind(n.to_string())
                }
            }
            Value::String(s) => query.bind(s.clone()),
            Value::Array(_) | Value::Object(_) => query.bind(sqlx::types::Json(value.clone())),
        };
    }
    query
}

fn decode<'r, T>(row: &'r MySqlRow, index: usize) -> Option<T>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get::<Option<T>, _>(index).ok().flatten()
}

/// Text columns, falling back to an unchecked decode for names reported as
/// binary strings (e.g. `SHOW TABLES` on some server versions)
fn decode_text(row: &MySqlRow, index: usize) -> Option<String> {
    decode::<String>(row, index).or_else(|| {
        row.try_get_unchecked::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    })
}

fn float(v: f64) -> Option<Value> {
    Number::from_f64(v).map(Value::Number)
}

/// Convert a row to a JSON object keyed by column name
pub(crate) fn row_to_json(row: &MySqlRow) -> Value {
    let mut obj = Map::new();
    for column in row.columns() {
        let index = column.ordinal();
        let type_name = column.type_info().name().to_ascii_uppercase();

        let value = match type_name.as_str() {
            "BOOLEAN" => decode::<bool>(row, index).map(Value::Bool),
            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
                decode::<i64>(row, index).map(|v| Value::Number(v.into()))
            }
            t if t.ends_with("UNSIGNED") => {
                decode::<u64>(row, index).map(|v| Value::Number(v.into()))
            }
            "DOUBLE" => decode::<f64>(row, index).and_then(float),
            "FLOAT" => decode::<f32>(row, index).and_then(|v| float(v as f64)),
            "JSON" => decode::<Value>(row, index),
            "DATETIME" => decode::<chrono::NaiveDateTime>(row, index)
                .map(|v| Value::String(v.format("%Y-%m-%d %H:%M:%S%.f").to_string())),
            "TIMESTAMP" => decode::<chrono::DateTime<chrono::Utc>>(row, index)
                .map(|v| Value::String(v.to_rfc3339())),
            "DATE" => decode::<chrono::NaiveDate>(row, index).map(|v| Value::String(v.to_string())),
            "TIME" => decode::<chrono::NaiveTime>(row, index).map(|v| Value::String(v.to_string())),
            "YEAR" => row
                .try_get_unchecked::<Option<u16>, _>(index)
                .ok()
                .flatten()
                .map(|v| Value::Number(v.into())),
            _ => decode_text(row, index).map(Value::String),
        }
        .unwrap_or(Value::Null);

        obj.insert(column.name().to_string(), value);
    }
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connection_params_defaults() {
        let params: ConnectionParams = serde_json::from_value(json!({
            "host": "127.0.0.1",
            "user": "root",
            "database": "shop"
        }))
        .unwrap();
        assert_eq!(params.port, 3306);
        assert_eq!(params.password, "");
    }

    #[test]
    fn test_connection_params_debug_hides_password() {
        let params: ConnectionParams = serde_json::from_value(json!({
            "host": "db",
            "user": "app",
            "password": "hunter2",
            "database": "shop"
        }))
        .unwrap();
        let debug = format!("{:?}", params);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_float_rejects_nan() {
        assert_eq!(float(1.5), Some(json!(1.5)));
        assert_eq!(float(f64::NAN), None);
    }
}
