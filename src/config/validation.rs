//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! reported at once rather than stopping at the first.

use std::net::SocketAddr;

use chrono_tz::Tz;

use crate::config::schema::ReceiverConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),
    #[error("endpoint.path `{0}` must start with '/'")]
    EndpointPath(String),
    #[error("persistence.log_dir must not be empty")]
    EmptyLogDir,
    #[error("persistence.timezone `{0}` is not a known IANA timezone")]
    Timezone(String),
    #[error("limits.max_body_size must be greater than zero")]
    ZeroBodyLimit,
    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,
    #[error("persistence.write_timeout_ms must be greater than zero and below timeouts.request_secs")]
    WriteTimeout,
    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ReceiverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if !config.endpoint.path.starts_with('/') {
        errors.push(ValidationError::EndpointPath(config.endpoint.path.clone()));
    }
    if config.persistence.log_dir.trim().is_empty() {
        errors.push(ValidationError::EmptyLogDir);
    }
    if config.persistence.timezone.parse::<Tz>().is_err() {
        errors.push(ValidationError::Timezone(config.persistence.timezone.clone()));
    }
    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    let write_timeout_ms = config.persistence.write_timeout_ms;
    let request_ms = config.timeouts.request_secs.saturating_mul(1000);
    if write_timeout_ms == 0 || (request_ms > 0 && write_timeout_ms >= request_ms) {
        errors.push(ValidationError::WriteTimeout);
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
