//! Startup wiring: turn configuration into store and functions clients.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AdminServiceConfig, StoreBackend};
use crate::error::RemoteResult;
use crate::notify::{FunctionsClient, RemoteFunctions};
use crate::store::{MemoryStore, RemoteStore, RestStore};

/// Remote collaborators selected by configuration.
pub struct Backends {
    pub store: Arc<dyn RemoteStore>,
    /// `None` when notifications are disabled or no functions host is known.
    pub functions: Option<Arc<dyn RemoteFunctions>>,
}

pub fn build_backends(config: &AdminServiceConfig) -> RemoteResult<Backends> {
    let timeout = Duration::from_secs(config.store.timeout_secs);

    let store: Arc<dyn RemoteStore> = match config.store.backend {
        StoreBackend::Rest => Arc::new(RestStore::new(&config.store.url, config.store.api_key.clone(), timeout)?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let functions: Option<Arc<dyn RemoteFunctions>> = match config.functions_url() {
        Some(url) if config.notifications.enabled => {
            let client = FunctionsClient::new(url, config.store.api_key.clone(), timeout)?;
            Some(Arc::new(client) as Arc<dyn RemoteFunctions>)
        }
        _ => {
            tracing::info!("Notification forwarding disabled");
            None
        }
    };

    tracing::info!(
        store = store.backend_name(),
        notifications = functions.is_some(),
        "Backends initialized"
    );

    Ok(Backends { store, functions })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_memory_without_notifications() {
        let backends = build_backends(&AdminServiceConfig::default()).unwrap();
        assert_eq!(backends.store.backend_name(), "memory");
        assert!(backends.functions.is_none());
    }

    #[test]
    fn test_rest_config_builds_both_clients() {
        let mut config = AdminServiceConfig::default();
        config.store.backend = StoreBackend::Rest;
        config.store.url = "http://127.0.0.1:54321".to_string();
        config.store.api_key = "key".to_string();

        let backends = build_backends(&config).unwrap();
        assert_eq!(backends.store.backend_name(), "rest");
        assert!(backends.functions.is_some());

        config.notifications.enabled = false;
        assert!(build_backends(&config).unwrap().functions.is_none());
    }
}
