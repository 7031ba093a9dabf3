//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the postback route
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener with peer address info
//! - Stop on the shutdown broadcast

use axum::{http::Request, middleware, routing::post, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ReceiverConfig;
use crate::http::postback::handle_postback;
use crate::http::request::{mark_generated_request_id, request_id_of, MakeRequestUuidV4};
use crate::persistence::{PersistError, PersistenceWriter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub writer: Arc<PersistenceWriter>,
    pub max_body_size: usize,
}

/// HTTP server for the postback receiver.
pub struct HttpServer {
    router: Router,
    config: ReceiverConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ReceiverConfig) -> Result<Self, PersistError> {
        let state = AppState {
            writer: Arc::new(PersistenceWriter::new(&config.persistence)?),
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ReceiverConfig, state: AppState) -> Router {
        Router::new()
            .route(&config.endpoint.path, post(handle_postback))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn(mark_generated_request_id))
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http().make_span_with(
                        |request: &Request<_>| {
                            tracing::info_span!(
                                "postback",
                                request_id = %request_id_of(request),
                                method = %request.method(),
                                path = %request.uri().path(),
                            )
                        },
                    ))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    )))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            endpoint = %self.config.endpoint.path,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, without a listener.
    pub fn into_router(self) -> Router {
        self.router
    }
}
