//! Remote row store subsystem.
//!
//! # Data Flow
//! ```text
//! ConfigService (reader / writer / deleter / toggle)
//!     → RemoteStore trait (select, insert, update, delete per table)
//!     → rest.rs   (PostgREST over HTTP, production)
//!     → memory.rs (in-process tables, tests and local runs)
//! ```
//!
//! # Design Decisions
//! - Rows are untyped JSON objects at this layer; typing happens per table
//! - One call is one request; no transactions span calls
//! - Update and delete filter on `id` and succeed even when nothing matched,
//!   matching PostgREST filter semantics

pub mod memory;
pub mod rest;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RemoteResult;

pub use memory::MemoryStore;
pub use rest::RestStore;

/// A single table row as returned by the store.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Sort direction for one ordering column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// One `(column, direction)` entry of an ordering specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub direction: Direction,
}

impl OrderBy {
    pub const fn asc(column: &'static str) -> Self {
        Self { column, direction: Direction::Asc }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self { column, direction: Direction::Desc }
    }
}

/// Row-oriented remote data service.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Select every column of every row, ordered by `order`.
    async fn select(&self, table: &str, order: &[OrderBy]) -> RemoteResult<Vec<Row>>;

    /// Insert a row without an identifier. Returns the stored row, including
    /// the identifier and any defaults the store assigned.
    async fn insert(&self, table: &str, record: Row) -> RemoteResult<Row>;

    /// Overwrite the given columns of the row with identifier `id`.
    async fn update(&self, table: &str, id: &str, patch: Row) -> RemoteResult<()>;

    /// Remove the row with identifier `id`.
    async fn delete(&self, table: &str, id: &str) -> RemoteResult<()>;

    /// Short backend name for status reporting.
    fn backend_name(&self) -> &'static str;
}
