//! Configuration read/write service.
//!
//! # Data Flow
//! ```text
//! fetch_all ─▶ QueryCache hit? ─▶ records
//!                 └─ miss ─▶ RemoteStore::select ─▶ cache ─▶ records
//!
//! save / delete / toggle_active
//!     ─▶ RemoteStore mutation
//!     ─▶ success: QueryCache::invalidate(table key)
//!     ─▶ failure: error returned, cache untouched
//! ```
//!
//! # Read-failure policy
//! A failed read (remote error or undecodable rows) yields an empty list and
//! is logged at debug level. Nothing is surfaced to the caller, nothing is
//! retried, and the empty list is not cached.

pub mod editor;
pub mod notice;

#[cfg(test)]
pub(crate) mod testing;

use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

use crate::cache::QueryCache;
use crate::error::{RemoteError, RemoteResult};
use crate::observability::metrics;
use crate::store::{RemoteStore, Row};
use crate::tables::ConfigTable;

pub use editor::{EditDialog, Submission};
pub use notice::{Notice, NoticeLevel};

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SaveOutcome {
    Created { id: String },
    Updated { id: String },
}

impl SaveOutcome {
    pub fn id(&self) -> &str {
        match self {
            SaveOutcome::Created { id } | SaveOutcome::Updated { id } => id,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, SaveOutcome::Updated { .. })
    }
}

/// Reader, writer, deleter and toggle for one configuration table.
pub struct ConfigService<T: ConfigTable> {
    store: Arc<dyn RemoteStore>,
    cache: QueryCache,
    _table: PhantomData<fn() -> T>,
}

impl<T: ConfigTable> Clone for ConfigService<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            cache: self.cache.clone(),
            _table: PhantomData,
        }
    }
}

impl<T: ConfigTable> ConfigService<T> {
    pub fn new(store: Arc<dyn RemoteStore>, cache: QueryCache) -> Self {
        Self {
            store,
            cache,
            _table: PhantomData,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// All rows in table order, from cache when valid.
    pub async fn fetch_all(&self) -> Vec<T::Record> {
        if let Some(rows) = self.cache.get(T::CACHE_KEY) {
            return decode_rows::<T>(&rows);
        }

        let generation = self.cache.generation(T::CACHE_KEY);
        let start = Instant::now();
        let result = self.store.select(T::TABLE, T::ORDERING).await;
        metrics::record_remote_call("select", T::TABLE, result.is_ok(), start);

        let rows = match result {
            Ok(rows) => rows,
            Err(e) => {
                tracing::debug!(table = T::TABLE, error = %e, "Read failed, returning no rows");
                return Vec::new();
            }
        };

        let records = decode_rows::<T>(&rows);
        self.cache.put_if_current(T::CACHE_KEY, generation, rows);
        records
    }

    /// Insert `form` as a new row, or replace the editable fields of row `id`.
    pub async fn save(&self, form: &T::Form, id: Option<&str>) -> RemoteResult<SaveOutcome> {
        let payload = to_row(form)?;
        let start = Instant::now();

        match id {
            Some(id) => {
                let result = self.store.update(T::TABLE, id, payload).await;
                self.finish("update", start, result)
                    .map(|()| SaveOutcome::Updated { id: id.to_string() })
            }
            None => {
                let result = self
                    .store
                    .insert(T::TABLE, payload)
                    .await
                    .and_then(|row| assigned_id(&row));
                self.finish("insert", start, result)
                    .map(|id| SaveOutcome::Created { id })
            }
        }
    }

    /// Remove row `id`.
    pub async fn delete(&self, id: &str) -> RemoteResult<()> {
        let start = Instant::now();
        let result = self.store.delete(T::TABLE, id).await;
        self.finish("delete", start, result)
    }

    /// Set `is_active` of row `id` to `!current`. Returns the value written.
    ///
    /// Nothing changes locally; the new value is only visible through the
    /// next read.
    pub async fn toggle_active(&self, id: &str, current: bool) -> RemoteResult<bool> {
        let next = !current;
        let mut patch = Row::new();
        patch.insert("is_active".to_string(), Value::Bool(next));

        let start = Instant::now();
        let result = self.store.update(T::TABLE, id, patch).await;
        self.finish("toggle", start, result).map(|()| next)
    }

    fn finish<R>(&self, operation: &'static str, start: Instant, result: RemoteResult<R>) -> RemoteResult<R> {
        metrics::record_remote_call(operation, T::TABLE, result.is_ok(), start);
        match &result {
            Ok(_) => {
                tracing::info!(table = T::TABLE, operation, "Mutation applied");
                self.cache.invalidate(T::CACHE_KEY);
            }
            Err(e) => {
                tracing::warn!(table = T::TABLE, operation, error = %e, "Mutation failed");
            }
        }
        result
    }
}

/// Typed records for `rows`. Rows that do not decode are skipped, not fatal.
fn decode_rows<T: ConfigTable>(rows: &[Row]) -> Vec<T::Record> {
    rows.iter()
        .filter_map(|row| match serde_json::from_value(Value::Object(row.clone())) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(table = T::TABLE, row_id = ?row.get("id"), error = %e, "Skipping undecodable row");
                None
            }
        })
        .collect()
}

fn to_row<S: Serialize>(value: &S) -> RemoteResult<Row> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(RemoteError::new(format!("payload is not an object: {}", other))),
    }
}

fn assigned_id(row: &Row) -> RemoteResult<String> {
    match row.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(RemoteError::new("inserted row carries no identifier")),
    }
}
