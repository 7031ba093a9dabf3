//! Content-type driven payload resolution.
//!
//! ```text
//! Content-Type contains
//!     application/json                   → serde_json::Value
//!     application/<subtype>+json         → serde_json::Value
//!     application/x-www-form-urlencoded  → field map
//!     multipart/form-data                → field map
//!     anything else / absent             → lossy UTF-8 text
//! any parse error                        → lossy UTF-8 text
//! ```

use std::collections::BTreeMap;

use axum::body::Body;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart};
use axum::http::{header, Request};
use bytes::Bytes;
use tower::{service_fn, Layer, ServiceExt};

use crate::capture::record::{form_fields, Payload};

/// A structured parse that did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid multipart body: {0}")]
    MultipartRejected(#[from] MultipartRejection),
    #[error("invalid multipart field: {0}")]
    Multipart(#[from] MultipartError),
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),
}

/// Outcome of payload resolution.
#[derive(Debug)]
pub struct Resolution {
    pub payload: Payload,
    /// Set when structured parsing failed and the raw text was used instead.
    pub fallback: Option<CaptureError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    UrlEncoded,
    Multipart,
    Other,
}

impl BodyKind {
    fn sniff(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return BodyKind::Other;
        };
        let content_type = content_type.to_ascii_lowercase();
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        let structured_json = essence.starts_with("application/") && essence.ends_with("+json");
        if content_type.contains("application/json") || structured_json {
            BodyKind::Json
        } else if content_type.contains("application/x-www-form-urlencoded") {
            BodyKind::UrlEncoded
        } else if content_type.contains("multipart/form-data") {
            BodyKind::Multipart
        } else {
            BodyKind::Other
        }
    }
}

/// Resolve a buffered body into a [`Payload`]. Never fails.
pub async fn resolve_payload(content_type: Option<&str>, body: Bytes) -> Resolution {
    let parsed = match BodyKind::sniff(content_type) {
        BodyKind::Json => serde_json::from_slice(&body)
            .map(Payload::Json)
            .map_err(CaptureError::from),
        BodyKind::UrlEncoded => Ok(Payload::Form(form_fields(&body))),
        BodyKind::Multipart => multipart_fields(content_type.unwrap_or_default(), body.clone())
            .await
            .map(Payload::Form),
        BodyKind::Other => Ok(Payload::lossy_text(&body)),
    };

    match parsed {
        Ok(payload) => Resolution {
            payload,
            fallback: None,
        },
        Err(err) => Resolution {
            payload: Payload::lossy_text(&body),
            fallback: Some(err),
        },
    }
}

/// Each part maps to its content decoded as lossy text. File parts are
/// keyed by field name like any other; repeated names keep the last part.
///
/// The body is already buffered under the configured size limit, so the
/// extractor's own default limit is lifted.
async fn multipart_fields(
    content_type: &str,
    body: Bytes,
) -> Result<BTreeMap<String, String>, CaptureError> {
    let request = Request::builder()
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .map_err(axum::Error::new)?;

    let parse = DefaultBodyLimit::disable().layer(service_fn(|request: Request<Body>| async move {
        let mut multipart = Multipart::from_request(request, &()).await?;

        let mut fields = BTreeMap::new();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            fields.insert(name, String::from_utf8_lossy(&data).into_owned());
        }
        Ok::<_, CaptureError>(fields)
    }));
    parse.oneshot(request).await
}
