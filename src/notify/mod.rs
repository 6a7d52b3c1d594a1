//! Outbound notification forwarding.
//!
//! # Data Flow
//! ```text
//! caller payload (opaque JSON object)
//!     → forwarder.rs (named function, error passthrough)
//!     → functions.rs (POST {url}/functions/v1/{name})
//! ```
//!
//! No retries and no backoff: the first remote error is the caller's error.

pub mod forwarder;
pub mod functions;

pub use forwarder::{NotificationForwarder, DEFAULT_FUNCTION_NAME};
pub use functions::{FunctionsClient, RemoteFunctions};
