//! Admin service for the multiplier and operator configuration tables.

pub mod admin;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod notify;
pub mod observability;
pub mod service;
pub mod store;
pub mod tables;

pub use config::schema::AdminServiceConfig;
pub use error::{RemoteError, RemoteResult};
pub use http::AdminServer;
pub use lifecycle::Shutdown;
