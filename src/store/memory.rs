//! In-process row store.
//!
//! Behaves like the hosted store for the operations this service uses:
//! identifiers are assigned on insert, `created_at` is a server-only column,
//! ordering follows Postgres rules (nulls last ascending, first descending).

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::error::RemoteResult;
use crate::store::{Direction, OrderBy, RemoteStore, Row};

/// Thread-safe in-memory tables keyed by table name.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<DashMap<String, Vec<Row>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held in `table`.
    pub fn row_count(&self, table: &str) -> usize {
        self.tables.get(table).map(|rows| rows.len()).unwrap_or(0)
    }

    /// Fetch a single row by identifier, bypassing ordering.
    pub fn get(&self, table: &str, id: &str) -> Option<Row> {
        let rows = self.tables.get(table)?;
        rows.iter().find(|row| row_has_id(row, id)).cloned()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn select(&self, table: &str, order: &[OrderBy]) -> RemoteResult<Vec<Row>> {
        let mut rows = self
            .tables
            .get(table)
            .map(|rows| rows.clone())
            .unwrap_or_default();
        rows.sort_by(|a, b| compare_rows(a, b, order));
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut record: Row) -> RemoteResult<Row> {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        record
            .entry("created_at")
            .or_insert_with(|| Value::from(created_at));

        self.tables
            .entry(table.to_string())
            .or_default()
            .push(record.clone());

        tracing::trace!(table = %table, "Row inserted into memory store");
        Ok(record)
    }

    async fn update(&self, table: &str, id: &str, patch: Row) -> RemoteResult<()> {
        if let Some(mut rows) = self.tables.get_mut(table) {
            if let Some(row) = rows.iter_mut().find(|row| row_has_id(row, id)) {
                for (column, value) in patch {
                    if column != "id" {
                        row.insert(column, value);
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> RemoteResult<()> {
        if let Some(mut rows) = self.tables.get_mut(table) {
            rows.retain(|row| !row_has_id(row, id));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

fn row_has_id(row: &Row, id: &str) -> bool {
    matches!(row.get("id"), Some(Value::String(s)) if s == id)
}

fn compare_rows(a: &Row, b: &Row, order: &[OrderBy]) -> Ordering {
    order
        .iter()
        .map(|o| {
            let ord = compare_column(a, b, o.column);
            match o.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn compare_column(a: &Row, b: &Row, column: &str) -> Ordering {
    let a = a.get(column).filter(|v| !v.is_null());
    let b = b.get(column).filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => compare_values(x, y),
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
