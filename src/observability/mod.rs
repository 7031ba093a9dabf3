//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! capture + persistence produce:
//!     → logging.rs (structured log events to stdout)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, when enabled)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span
//! - Metrics are cheap and disabled unless configured

pub mod logging;
pub mod metrics;
