//! The postback capture handler.
//!
//! Always answers `200` with a success envelope. Body parse failures and
//! persistence failures are logged here and go no further.

use std::net::SocketAddr;

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, State},
    http::{header, Request},
    Json,
};

use crate::capture::{resolve_payload, CaptureError, CaptureRecord, Payload, ResponseEnvelope};
use crate::http::request::{sender_headers, GeneratedRequestId};
use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn handle_postback(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Json<ResponseEnvelope> {
    let (parts, body) = request.into_parts();
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    let payload = match to_bytes(body, state.max_body_size).await {
        Ok(bytes) => {
            let resolution = resolve_payload(content_type.as_deref(), bytes).await;
            if let Some(e) = resolution.fallback {
                discard_capture_error(e);
            }
            resolution.payload
        }
        Err(e) => {
            discard_capture_error(CaptureError::Body(e));
            Payload::Text(String::new())
        }
    };

    let generated_id = parts.extensions.get::<GeneratedRequestId>().is_some();
    let headers = sender_headers(parts.headers, generated_id);
    let record = CaptureRecord::new(peer, &headers, &parts.uri, payload);

    tracing::info!(ip = %record.ip, "Received postback from {}", record.ip);
    tracing::info!("Headers: {:?}", record.headers);
    tracing::info!("Query Params: {:?}", record.query_params);
    tracing::info!("Payload: {}", record.payload);
    metrics::record_postback(record.payload.kind());

    let envelope = ResponseEnvelope::success(record);
    state.writer.persist(&envelope).await;

    Json(envelope)
}

/// The sender still gets a success envelope; the payload became raw text.
fn discard_capture_error(e: CaptureError) {
    metrics::record_payload_fallback();
    tracing::error!(error = %e, "Error capturing payload");
}
