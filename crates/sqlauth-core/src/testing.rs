//! In-memory executor for unit tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::executor::{QueryError, QueryExecutor, ResultSet, Row, Value};

/// Answers queries from a script keyed by SQL text and first parameter.
///
/// Unscripted queries return no rows. Every call is recorded.
#[derive(Default)]
pub(crate) struct ScriptedExecutor {
    responses: Mutex<HashMap<(String, String), Vec<Row>>>,
    failures: Mutex<HashMap<String, QueryError>>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl ScriptedExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Return `rows` when `sql` runs with `param` bound first.
    pub(crate) fn respond(&self, sql: &str, param: &str, rows: Vec<Row>) {
        self.responses
            .lock()
            .insert((sql.to_string(), param.to_string()), rows);
    }

    /// Fail every run of `sql`.
    pub(crate) fn fail(&self, sql: &str, error: QueryError) {
        self.failures.lock().insert(sql.to_string(), error);
    }

    pub(crate) fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<ResultSet, QueryError> {
        self.calls.lock().push((sql.to_string(), params.to_vec()));

        if let Some(err) = self.failures.lock().get(sql) {
            return Err(err.clone());
        }

        let param = params
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let rows = self
            .responses
            .lock()
            .get(&(sql.to_string(), param))
            .cloned()
            .unwrap_or_default();
        Ok(ResultSet::new(rows))
    }
}
