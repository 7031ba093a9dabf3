//! Capture subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → record.rs (peer ip, headers, query params)
//!     → payload.rs (content-type sniffing, parse or lossy-text fallback)
//!     → CaptureRecord
//!     → ResponseEnvelope { status: "success", captured }
//! ```
//!
//! # Design Decisions
//! - Resolution never fails; parse errors come back as data for the caller to log
//! - Payload is always serializable (bytes are decoded before leaving this module)

pub mod payload;
pub mod record;

pub use payload::{resolve_payload, CaptureError, Resolution};
pub use record::{CaptureRecord, Payload, ResponseEnvelope};
