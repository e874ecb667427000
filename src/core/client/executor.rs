//! Query executor contract shared by the production HiveSQL client and
//! the in-test doubles.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// A single result row, keyed by column name. Column order follows the
/// select list of the originating query.
pub type SqlRow = serde_json::Map<String, Value>;

/// Parameter value bound into a query (`@P1`, `@P2`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

/// A parameterized query. Day counts and other runtime values travel as
/// bound parameters, never as interpolated text.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub text: String,
    pub params: Vec<SqlParam>,
}

impl SqlQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(text: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            text: text.into(),
            params,
        }
    }
}

/// Rows plus the affected-row count reported by the server.
#[derive(Debug, Clone, Default)]
pub struct QueryOutput {
    pub rows: Vec<SqlRow>,
    pub rows_affected: u64,
}

#[derive(Debug, Error)]
pub enum QueryError {
    /// The data source could not be reached at all.
    #[error("data source unreachable: {0}")]
    Connectivity(String),

    /// The query itself failed (malformed statement, timeout, ...).
    #[error("query execution failed: {0}")]
    Execution(String),
}

/// Opaque "execute SQL, get rows" collaborator. The aggregation layer
/// issues read-only queries through this trait and owns no connection
/// state of its own.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, query: &SqlQuery) -> Result<QueryOutput, QueryError>;
}
