//! Query executor boundary.
//!
//! Connection acquisition, pooling and timeouts belong to the executor. The
//! authenticator only hands it SQL text with positional `?` parameters and
//! reads back rows of typed columns.

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a query executor.
#[derive(Debug, Error, Clone)]
pub enum QueryError {
    /// Could not acquire or use a connection.
    #[error("connection error: {0}")]
    Connection(String),

    /// The statement failed to prepare or run.
    #[error("query error: {0}")]
    Execution(String),
}

/// Errors reading a column out of a [`Row`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ColumnError {
    /// The row has fewer columns than requested.
    #[error("column {index} out of range (row has {len} columns)")]
    OutOfRange { index: usize, len: usize },

    /// The column holds a value of another type.
    #[error("column {index} is not a string (found {found})")]
    TypeMismatch { index: usize, found: &'static str },
}

/// A scalar query parameter or column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    String(String),
    /// Binary data.
    Bytes(Vec<u8>),
}

impl Value {
    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the value's type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int64(_) => "int64",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int64(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// One result row with positional column access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Create a row from column values.
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Get a column value.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Read a nullable string column.
    ///
    /// Returns `Ok(None)` for SQL NULL.
    pub fn get_string(&self, index: usize) -> Result<Option<&str>, ColumnError> {
        match self.values.get(index) {
            None => Err(ColumnError::OutOfRange {
                index,
                len: self.values.len(),
            }),
            Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(ColumnError::TypeMismatch {
                index,
                found: other.type_name(),
            }),
        }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// Rows returned by a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    rows: Vec<Row>,
}

impl ResultSet {
    /// Create a result set from rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Number of rows returned.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Borrow the rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Collect the non-null strings of the first column.
    pub fn first_column_strings(&self) -> Result<Vec<String>, ColumnError> {
        let mut out = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            if let Some(s) = row.get_string(0)? {
                out.push(s.to_string());
            }
        }
        Ok(out)
    }
}

impl FromIterator<Row> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Executes parameterized SQL against the credential store.
///
/// Implementations must bind `params` to the positional `?` placeholders and
/// release any acquired connection before returning, on success and failure.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a query and return all rows.
    async fn query(&self, sql: &str, params: &[Value]) -> Result<ResultSet, QueryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_string() {
        let row = Row::new(vec![Value::from("hash"), Value::Null, Value::Int64(7)]);
        assert_eq!(row.get_string(0).unwrap(), Some("hash"));
        assert_eq!(row.get_string(1).unwrap(), None);
        assert_eq!(
            row.get_string(2),
            Err(ColumnError::TypeMismatch {
                index: 2,
                found: "int64"
            })
        );
        assert_eq!(
            row.get_string(3),
            Err(ColumnError::OutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_first_column_strings_skips_nulls() {
        let rs: ResultSet = vec![
            Row::new(vec![Value::from("dev")]),
            Row::new(vec![Value::Null]),
            Row::new(vec![Value::from("admin")]),
        ]
        .into_iter()
        .collect();

        assert_eq!(rs.num_rows(), 3);
        assert_eq!(rs.first_column_strings().unwrap(), vec!["dev", "admin"]);
    }

    #[test]
    fn test_value_from_option() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::String("x".into()));
        assert_eq!(Value::from(7i64).as_str(), None);
    }
}
