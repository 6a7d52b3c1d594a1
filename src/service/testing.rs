//! Store double that can be switched into a failing mode.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{RemoteError, RemoteResult};
use crate::store::{MemoryStore, OrderBy, RemoteStore, Row};

#[derive(Clone, Default)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    failing: Arc<AtomicBool>,
    selects: Arc<AtomicUsize>,
}

impl FlakyStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn error() -> RemoteError {
        RemoteError::new("connection refused").with_status(503)
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of select calls that reached the store.
    pub(crate) fn selects(&self) -> usize {
        self.selects.load(Ordering::SeqCst)
    }

    fn check(&self) -> RemoteResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(Self::error())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteStore for FlakyStore {
    async fn select(&self, table: &str, order: &[OrderBy]) -> RemoteResult<Vec<Row>> {
        self.selects.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.select(table, order).await
    }

    async fn insert(&self, table: &str, record: Row) -> RemoteResult<Row> {
        self.check()?;
        self.inner.insert(table, record).await
    }

    async fn update(&self, table: &str, id: &str, patch: Row) -> RemoteResult<()> {
        self.check()?;
        self.inner.update(table, id, patch).await
    }

    async fn delete(&self, table: &str, id: &str) -> RemoteResult<()> {
        self.check()?;
        self.inner.delete(table, id).await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}
