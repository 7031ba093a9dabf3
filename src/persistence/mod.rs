//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! ResponseEnvelope
//!     → stamp.rs (local time in configured zone → file name + timestamp)
//!     → writer.rs (create dir, append "<timestamp> | <json>\n")
//!     → <log_dir>/response_log_<YYYY>_<MM>_<DD>.txt
//! ```
//!
//! # Design Decisions
//! - Failures never reach the HTTP response; `persist` logs and drops them
//! - `try_persist_at` keeps the fallible path visible and testable
//! - No application-level lock; append-mode writes keep lines whole

pub mod stamp;
pub mod writer;

pub use stamp::{LogStamp, ZoneStamper};
pub use writer::{PersistError, PersistenceWriter};
