//! Forwards notification payloads to a single named remote function.

use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::error::RemoteResult;
use crate::notify::functions::RemoteFunctions;
use crate::observability::metrics;

/// Function that posts rank changes to Discord.
pub const DEFAULT_FUNCTION_NAME: &str = "discord-rank-notification";

#[derive(Clone)]
pub struct NotificationForwarder {
    functions: Arc<dyn RemoteFunctions>,
    function_name: String,
}

impl NotificationForwarder {
    pub fn new(functions: Arc<dyn RemoteFunctions>, function_name: impl Into<String>) -> Self {
        Self {
            functions,
            function_name: function_name.into(),
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Send `payload` as-is. A remote error is returned unchanged.
    pub async fn forward(&self, payload: Map<String, Value>) -> RemoteResult<()> {
        let start = Instant::now();
        let result = self
            .functions
            .invoke(&self.function_name, &Value::Object(payload))
            .await;
        metrics::record_remote_call("invoke", &self.function_name, result.is_ok(), start);

        match result {
            Ok(_) => {
                tracing::info!(function = %self.function_name, "Notification forwarded");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(function = %self.function_name, error = %e, "Notification forwarding failed");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for NotificationForwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationForwarder")
            .field("function_name", &self.function_name)
            .finish()
    }
}
