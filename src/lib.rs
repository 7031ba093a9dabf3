//! Sailthru postback receiver library.

pub mod capture;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod persistence;

pub use config::schema::ReceiverConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
