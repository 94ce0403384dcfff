//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! blockchain / harness produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every RPC and contract event
//! - Metrics go through the `metrics` facade; exporting is the caller's choice

pub mod logging;
pub mod metrics;
