//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional --config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ReceiverConfig (validated, immutable)
//!     → handed to HttpServer and PersistenceWriter at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults; an absent file means the defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    EndpointConfig, LabelMode, LimitsConfig, ListenerConfig, ObservabilityConfig,
    PersistenceConfig, ReceiverConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
