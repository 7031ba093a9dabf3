//! End-to-end tests for the postback endpoint.

use reqwest::multipart;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

fn persisted_envelope(line: &str) -> Value {
    let (timestamp, json) = line.split_once(" | ").expect("line has a separator");
    assert!(timestamp.ends_with(" CST"), "unexpected timestamp {timestamp:?}");
    serde_json::from_str(json).unwrap()
}

#[tokio::test]
async fn json_postback_round_trip() {
    let receiver = common::start_receiver().await;

    let res = common::client()
        .post(receiver.url("/sailthru_postback?uid=42"))
        .header("Content-Type", "application/json")
        .body(r#"{"event":"open"}"#)
        .send()
        .await
        .expect("Receiver unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["captured"]["ip"], "127.0.0.1");
    assert_eq!(body["captured"]["headers"]["content-type"], "application/json");
    assert!(body["captured"]["headers"].get("x-request-id").is_none());
    assert_eq!(body["captured"]["query_params"], json!({"uid": "42"}));
    assert_eq!(body["captured"]["payload"], json!({"event": "open"}));

    let lines = receiver.persisted_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(persisted_envelope(&lines[0]), body);
}

#[tokio::test]
async fn vendor_json_media_type_is_parsed() {
    let receiver = common::start_receiver().await;

    let body: Value = common::client()
        .post(receiver.url("/sailthru_postback"))
        .header("Content-Type", "application/vnd.api+json")
        .body(r#"{"event":"open"}"#)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["captured"]["payload"], json!({"event": "open"}));
}

#[tokio::test]
async fn urlencoded_form_becomes_field_map() {
    let receiver = common::start_receiver().await;

    let body: Value = common::client()
        .post(receiver.url("/sailthru_postback"))
        .form(&[("email", "jane@example.com"), ("action", "optout")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body["captured"]["payload"],
        json!({"email": "jane@example.com", "action": "optout"})
    );
}

#[tokio::test]
async fn multipart_form_becomes_field_map() {
    let receiver = common::start_receiver().await;

    let form = multipart::Form::new()
        .text("event", "click")
        .text("url", "https://example.com/a?b=c");
    let body: Value = common::client()
        .post(receiver.url("/sailthru_postback"))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(
        body["captured"]["payload"],
        json!({"event": "click", "url": "https://example.com/a?b=c"})
    );
}

#[tokio::test]
async fn unknown_content_type_is_lossy_text() {
    let receiver = common::start_receiver().await;

    let body: Value = common::client()
        .post(receiver.url("/sailthru_postback"))
        .header("Content-Type", "application/octet-stream")
        .body(b"caf\xc3\xa9 \xff\xfe end".to_vec())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["captured"]["payload"], "café \u{FFFD}\u{FFFD} end");
}

#[tokio::test]
async fn missing_content_type_is_text() {
    let receiver = common::start_receiver().await;

    let res = common::client()
        .post(receiver.url("/sailthru_postback"))
        .body("plain words")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert!(body["captured"]["headers"].get("content-type").is_none());
    assert_eq!(body["captured"]["payload"], "plain words");
}

#[tokio::test]
async fn empty_body_is_empty_text() {
    let receiver = common::start_receiver().await;

    let body: Value = common::client()
        .post(receiver.url("/sailthru_postback"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["captured"]["payload"], "");
    assert_eq!(body["captured"]["query_params"], json!({}));
}

#[tokio::test]
async fn malformed_json_still_succeeds_with_text() {
    let receiver = common::start_receiver().await;

    let res = common::client()
        .post(receiver.url("/sailthru_postback"))
        .header("Content-Type", "application/json")
        .body("{\"event\": \"open\"")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["captured"]["payload"], "{\"event\": \"open\"");
}

#[tokio::test]
async fn repeated_requests_append_lines() {
    let receiver = common::start_receiver().await;
    let client = common::client();

    for expected in 1..=3 {
        let res = client
            .post(receiver.url("/sailthru_postback?uid=7"))
            .header("Content-Type", "application/json")
            .body(r#"{"event":"delivered"}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(receiver.persisted_lines().len(), expected);
    }

    let files: Vec<_> = std::fs::read_dir(&receiver.log_dir).unwrap().collect();
    assert_eq!(files.len(), 1);
    let name = files[0].as_ref().unwrap().file_name();
    let name = name.to_string_lossy();
    assert!(name.starts_with("response_log_") && name.ends_with(".txt"), "{name}");
}

#[tokio::test]
async fn persistence_failure_does_not_reach_the_sender() {
    let blocker = tempfile::NamedTempFile::new().unwrap();
    let log_dir = blocker.path().join("logs").to_string_lossy().into_owned();
    let receiver = common::start_receiver_with(|config| {
        config.persistence.log_dir = log_dir;
    })
    .await;

    let res = common::client()
        .post(receiver.url("/sailthru_postback"))
        .header("Content-Type", "application/json")
        .body(r#"{"event":"open"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["captured"]["payload"], json!({"event": "open"}));
}

#[tokio::test]
async fn custom_endpoint_path() {
    let receiver = common::start_receiver_with(|config| {
        config.endpoint.path = "/hooks/postback".to_string();
        config.persistence.enabled = false;
    })
    .await;
    let client = common::client();

    let res = client
        .post(receiver.url("/hooks/postback"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(receiver.url("/sailthru_postback"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(receiver.persisted_lines().is_empty());
}
