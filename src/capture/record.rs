//! Capture record and response envelope types.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::http::{HeaderMap, Uri};
use serde::Serialize;

/// The body of a postback after content-type resolution.
///
/// Always serializable; raw bytes never leave the resolver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Json(serde_json::Value),
    Form(BTreeMap<String, String>),
    Text(String),
}

impl Payload {
    /// Decode raw bytes as text, replacing invalid sequences with U+FFFD.
    pub fn lossy_text(bytes: &[u8]) -> Self {
        Payload::Text(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Json(_) => "json",
            Payload::Form(_) => "form",
            Payload::Text(_) => "text",
        }
    }
}

impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Json(value) => write!(f, "{}", value),
            Payload::Form(fields) => write!(f, "{:?}", fields),
            Payload::Text(text) => write!(f, "{:?}", text),
        }
    }
}

/// Everything captured from one inbound postback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureRecord {
    pub ip: String,
    pub headers: BTreeMap<String, String>,
    pub query_params: BTreeMap<String, String>,
    pub payload: Payload,
}

impl CaptureRecord {
    pub fn new(peer: SocketAddr, headers: &HeaderMap, uri: &Uri, payload: Payload) -> Self {
        Self {
            ip: peer.ip().to_string(),
            headers: header_map(headers),
            query_params: query_map(uri),
            payload,
        }
    }
}

/// The wire-level acknowledgement returned to the sender and persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub status: &'static str,
    pub captured: CaptureRecord,
}

impl ResponseEnvelope {
    pub fn success(captured: CaptureRecord) -> Self {
        Self {
            status: "success",
            captured,
        }
    }
}

/// Header names are already lower-case; repeated headers keep the last value.
pub fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

pub fn query_map(uri: &Uri) -> BTreeMap<String, String> {
    uri.query()
        .map(|q| form_fields(q.as_bytes()))
        .unwrap_or_default()
}

/// Parse `application/x-www-form-urlencoded` data. Never fails; repeated
/// keys keep the last value.
pub fn form_fields(input: &[u8]) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(input).into_owned().collect()
}
