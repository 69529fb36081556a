//! SQLite query executor for sqlauth.
//!
//! Wraps a single [`rusqlite::Connection`] behind a mutex and runs each
//! statement on the blocking thread pool.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, OpenFlags};

use sqlauth_core::{QueryError, QueryExecutor, ResultSet, Row, Value};

/// Schema of the default credential layout.
///
/// Matches the default authentication, roles and permissions queries.
pub const DEFAULT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS USER (
    USERNAME TEXT NOT NULL,
    PASSWORD TEXT,
    PASSWORD_SALT TEXT
);

CREATE TABLE IF NOT EXISTS USER_ROLES (
    USERNAME TEXT NOT NULL,
    ROLE TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ROLES_PERMS (
    ROLE TEXT NOT NULL,
    PERM TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS IDX_USER_USERNAME ON USER(USERNAME);
CREATE INDEX IF NOT EXISTS IDX_USER_ROLES_USERNAME ON USER_ROLES(USERNAME);
CREATE INDEX IF NOT EXISTS IDX_ROLES_PERMS_ROLE ON ROLES_PERMS(ROLE);
"#;

/// Query executor over a SQLite database.
///
/// Clones share the same connection.
#[derive(Clone)]
pub struct SqliteExecutor {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteExecutor {
    /// Open or create a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, QueryError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            QueryError::Connection(format!("failed to open {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "opened sqlite database");
        Ok(Self::from_connection(conn))
    }

    /// Open a database file that must already exist.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self, QueryError> {
        let path = path.as_ref();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|e| {
            QueryError::Connection(format!("failed to open {}: {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "opened existing sqlite database");
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, QueryError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| QueryError::Connection(format!("failed to open in-memory database: {}", e)))?;
        Ok(Self::from_connection(conn))
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create the default `USER`, `USER_ROLES` and `ROLES_PERMS` tables.
    pub async fn create_default_schema(&self) -> Result<(), QueryError> {
        self.execute_batch(DEFAULT_SCHEMA).await
    }

    /// Run one or more statements without parameters.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), QueryError> {
        let conn = self.conn.clone();
        let sql = sql.to_string();

        tokio::task::spawn_blocking(move || {
            conn.lock()
                .execute_batch(&sql)
                .map_err(|e| QueryError::Execution(e.to_string()))
        })
        .await
        .map_err(|e| QueryError::Connection(format!("task join failed: {}", e)))?
    }

    /// Run a single parameterized statement and return the affected row count.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, QueryError> {
        let conn = self.conn.clone();
        let sql = sql.to_string();
        let params: Vec<SqlValue> = params.iter().map(to_sql).collect();

        tokio::task::spawn_blocking(move || {
            conn.lock()
                .execute(&sql, rusqlite::params_from_iter(params))
                .map_err(|e| QueryError::Execution(e.to_string()))
        })
        .await
        .map_err(|e| QueryError::Connection(format!("task join failed: {}", e)))?
    }

    fn query_sync(conn: &Connection, sql: &str, params: Vec<SqlValue>) -> rusqlite::Result<ResultSet> {
        let mut stmt = conn.prepare(sql)?;
        let columns = stmt.column_count();
        let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(columns);
            for i in 0..columns {
                values.push(from_sql(row.get_ref(i)?));
            }
            out.push(Row::new(values));
        }
        Ok(ResultSet::new(out))
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<ResultSet, QueryError> {
        let conn = self.conn.clone();
        let sql = sql.to_string();
        let params: Vec<SqlValue> = params.iter().map(to_sql).collect();

        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            Self::query_sync(&guard, &sql, params).map_err(|e| QueryError::Execution(e.to_string()))
        })
        .await
        .map_err(|e| QueryError::Connection(format!("task join failed: {}", e)))?
    }
}

impl std::fmt::Debug for SqliteExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteExecutor").finish_non_exhaustive()
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int64(i) => SqlValue::Integer(*i),
        Value::Float64(f) => SqlValue::Real(*f),
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Bytes(b) => SqlValue::Blob(b.clone()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int64(i),
        ValueRef::Real(f) => Value::Float64(f),
        // SQLite does not enforce UTF-8 on TEXT; keep invalid text as bytes.
        ValueRef::Text(t) => match std::str::from_utf8(t) {
            Ok(s) => Value::String(s.to_string()),
            Err(_) => Value::Bytes(t.to_vec()),
        },
        ValueRef::Blob(b) => Value::Bytes(b.to_vec()),
    }
}
