//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! services, stores, forwarder:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (remote call counters and latencies, cache invalidations)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Remote failures on the read path log at debug, mutations at warn
//! - Metric recording is a no-op until an exporter is installed

pub mod logging;
pub mod metrics;
