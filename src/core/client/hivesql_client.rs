//! Production `QueryExecutor` backed by HiveSQL (MSSQL over TDS).
//!
//! Connections are acquired per query and released on completion; the
//! aggregation layer never sees or owns connection state.

use std::env;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use tiberius::{AuthMethod, Client, ColumnData, Config, EncryptionLevel, FromSql, ToSql};
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;
use tracing::debug;

use super::executor::{QueryError, QueryExecutor, QueryOutput, SqlParam, SqlQuery, SqlRow};

/// Connection settings for the HiveSQL endpoint, read from the
/// environment once at startup and injected explicitly.
#[derive(Debug, Clone)]
pub struct HiveSqlConfig {
    pub server: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl HiveSqlConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let server = env::var("HIVESQL_SERVER")?;
        let port = env::var("HIVESQL_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(1433);
        let database = env::var("HIVESQL_DATABASE")?;
        let username = env::var("HIVESQL_USERNAME")?;
        let password = env::var("HIVESQL_PASSWORD")?;

        Ok(Self {
            server,
            port,
            database,
            username,
            password,
        })
    }
}

pub struct HiveSqlExecutor {
    config: HiveSqlConfig,
}

impl HiveSqlExecutor {
    pub fn new(config: HiveSqlConfig) -> Self {
        Self { config }
    }

    fn client_config(&self) -> Config {
        let mut config = Config::new();
        config.host(&self.config.server);
        config.port(self.config.port);
        config.database(&self.config.database);
        config.authentication(AuthMethod::sql_server(
            &self.config.username,
            &self.config.password,
        ));
        config.encryption(EncryptionLevel::Required);
        config.trust_cert();
        config
    }
}

#[async_trait]
impl QueryExecutor for HiveSqlExecutor {
    async fn execute(&self, query: &SqlQuery) -> Result<QueryOutput, QueryError> {
        let config = self.client_config();

        let tcp = TcpStream::connect(config.get_addr())
            .await
            .map_err(|e| QueryError::Connectivity(e.to_string()))?;
        tcp.set_nodelay(true)
            .map_err(|e| QueryError::Connectivity(e.to_string()))?;

        let mut client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| QueryError::Connectivity(e.to_string()))?;

        debug!(
            "executing query: {}...",
            query.text.chars().take(100).collect::<String>()
        );

        let params: Vec<&dyn ToSql> = query
            .params
            .iter()
            .map(|p| match p {
                SqlParam::Int(v) => v as &dyn ToSql,
                SqlParam::Text(v) => v as &dyn ToSql,
            })
            .collect();

        let rows = client
            .query(query.text.as_str(), &params)
            .await
            .map_err(|e| QueryError::Execution(e.to_string()))?
            .into_first_result()
            .await
            .map_err(|e| QueryError::Execution(e.to_string()))?;

        debug!("query returned {} rows", rows.len());

        let rows: Vec<SqlRow> = rows.into_iter().map(row_to_json).collect();
        let rows_affected = rows.len() as u64;

        Ok(QueryOutput {
            rows,
            rows_affected,
        })
    }
}

fn row_to_json(row: tiberius::Row) -> SqlRow {
    let names: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();

    let mut map = SqlRow::new();
    for (name, data) in names.into_iter().zip(row.into_iter()) {
        map.insert(name, column_to_value(data));
    }
    map
}

fn column_to_value(data: ColumnData<'static>) -> Value {
    match data {
        ColumnData::Bit(v) => v.map(Value::Bool).unwrap_or(Value::Null),
        ColumnData::U8(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::I16(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::I32(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::I64(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::F32(v) => float_value(v.map(f64::from)),
        ColumnData::F64(v) => float_value(v),
        ColumnData::Numeric(v) => float_value(v.map(f64::from)),
        ColumnData::String(v) => v
            .map(|s| Value::String(s.into_owned()))
            .unwrap_or(Value::Null),
        d @ ColumnData::Date(_) => NaiveDate::from_sql(&d)
            .ok()
            .flatten()
            .map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null),
        d @ (ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_)) => {
            NaiveDateTime::from_sql(&d)
                .ok()
                .flatten()
                .map(|dt| Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()))
                .unwrap_or(Value::Null)
        }
        _ => Value::Null,
    }
}

fn float_value(v: Option<f64>) -> Value {
    v.and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_conversion_maps_null_and_numbers() {
        assert_eq!(column_to_value(ColumnData::I32(None)), Value::Null);
        assert_eq!(column_to_value(ColumnData::I32(Some(42))), Value::from(42));
        assert_eq!(
            column_to_value(ColumnData::F64(Some(1.5))),
            Value::from(1.5)
        );
    }

    #[test]
    fn config_reads_environment_with_default_port() {
        env::set_var("HIVESQL_SERVER", "vip.hivesql.io");
        env::set_var("HIVESQL_DATABASE", "DBHive");
        env::set_var("HIVESQL_USERNAME", "Hive-user");
        env::set_var("HIVESQL_PASSWORD", "secret");
        env::remove_var("HIVESQL_PORT");

        let config = HiveSqlConfig::from_env().unwrap();
        assert_eq!(config.server, "vip.hivesql.io");
        assert_eq!(config.port, 1433);
        assert_eq!(config.database, "DBHive");
    }
}
