//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the admin
//! service. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

use crate::notify::DEFAULT_FUNCTION_NAME;

/// Placeholder admin key shipped in defaults. Rejected for the rest backend.
pub const PLACEHOLDER_ADMIN_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

/// Root configuration for the admin service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Remote row store connection.
    pub store: StoreConfig,

    /// Notification forwarding target.
    pub notifications: NotificationConfig,

    /// Admin API authentication.
    pub admin: AdminConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Which store implementation backs the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Hosted PostgREST endpoint.
    Rest,
    /// In-process tables, lost on restart.
    #[default]
    Memory,
}

/// Remote store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Project URL (e.g., "https://abc.supabase.co").
    pub url: String,

    /// Project API key, sent as `apikey` and bearer token.
    pub api_key: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: String::new(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Notification forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Enable the forwarding endpoint.
    pub enabled: bool,

    /// Name of the remote function to invoke.
    pub function_name: String,

    /// Functions host. Falls back to the store URL.
    pub url: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            function_name: DEFAULT_FUNCTION_NAME.to_string(),
            url: None,
        }
    }
}

impl AdminServiceConfig {
    /// URL of the functions host, if one is configured.
    pub fn functions_url(&self) -> Option<&str> {
        self.notifications
            .url
            .as_deref()
            .or_else(|| (!self.store.url.is_empty()).then_some(self.store.url.as_str()))
    }

    /// Whether the admin key is still the published placeholder.
    pub fn uses_placeholder_key(&self) -> bool {
        self.admin.api_key == PLACEHOLDER_ADMIN_KEY
    }

    /// With the placeholder key, only accept connections from this host.
    ///
    /// Rewrites a non-loopback bind address to `127.0.0.1`, keeping the port.
    /// Returns true if the address changed.
    pub fn confine_placeholder_key(&mut self) -> bool {
        if !self.uses_placeholder_key() {
            return false;
        }
        match self.listener.bind_address.parse::<SocketAddr>() {
            Ok(addr) if !addr.ip().is_loopback() => {
                let confined = SocketAddr::new(Ipv4Addr::LOCALHOST.into(), addr.port());
                self.listener.bind_address = confined.to_string();
                true
            }
            _ => false,
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_key: PLACEHOLDER_ADMIN_KEY.to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total time allowed for one admin API request, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
