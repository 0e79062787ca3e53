//! HTTP server and routing integration tests
//!
//! Exercises request validation, error body shape, and the endpoints that
//! never leave the process (health check, UPI lookup). Flows that need a
//! responding analysis backend live in workflow_tests.rs.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use safepay_common::config::GatewayConfig;
use safepay_ea::{build_router, AppState};
use serde_json::{json, Value};
use std::path::Path;
use tower::ServiceExt;

/// Minimal valid WAV header, enough for content sniffing
const WAV_BYTES: &[u8] = b"RIFF\x24\x00\x00\x00WAVEfmt ";

/// Gateway configuration with every backend pointed at a closed local port
fn test_config(uploads_dir: &Path) -> GatewayConfig {
    GatewayConfig {
        port: 0,
        voice_analysis_url: "http://127.0.0.1:9".to_string(),
        document_service_url: "http://127.0.0.1:9".to_string(),
        media_service_url: "http://127.0.0.1:9".to_string(),
        transcription_base_url: "http://127.0.0.1:9".to_string(),
        transcription_api_key: Some("test-api-key".to_string()),
        poll_interval_ms: 10,
        max_poll_attempts: 3,
        request_timeout_secs: 2,
        uploads_dir: uploads_dir.to_path_buf(),
        max_upload_bytes: 5 * 1024 * 1024,
        log_filter: "info".to_string(),
    }
}

fn test_app(config: GatewayConfig) -> axum::Router {
    let state = AppState::new(config).expect("Failed to build app state");
    build_router(state)
}

/// Build a POST request carrying a JSON body
fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

/// Build a POST request carrying one multipart file field
fn multipart_request(
    uri: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    payload: &[u8],
) -> Request<Body> {
    let boundary = "safepay-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_returns_json() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type");
    assert!(
        content_type.is_some()
            && content_type.unwrap().to_str().unwrap().contains("application/json"),
        "/health should return JSON"
    );

    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "safepay-ea");
    assert!(json["version"].is_string());
    assert!(json["uptime_seconds"].is_u64());
    // No failures yet, so the diagnostic field is omitted entirely
    assert!(json.get("last_error").is_none());
}

#[tokio::test]
async fn test_health_reports_last_failure() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    // Text analysis against a closed port records an upstream failure
    let response = app
        .clone()
        .oneshot(json_request("/api/analyze-text", json!({"text": "hello"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert!(
        json["last_error"].is_string(),
        "Health should surface the most recent upstream failure"
    );
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/no-such-endpoint")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_error_body_carries_kind_and_details_only() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    let response = app
        .oneshot(json_request("/api/analyze-text", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    let fields = json.as_object().unwrap();
    assert_eq!(fields.len(), 2, "Error body should be exactly {{error, details}}");
    assert_eq!(json["error"], "invalid_evidence");
    assert!(json["details"].is_string());
}

// ============================================================================
// UPI lookup
// ============================================================================

#[tokio::test]
async fn test_upi_check_flags_fraud_ids() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/upi/check/scammer.fraud@upi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["upiId"], "scammer.fraud@upi");
    assert_eq!(json["riskPercentage"], 90);
    assert_eq!(json["riskLevel"], "High");
    assert_eq!(json["reports"], 5);
    assert_eq!(json["reason"], "Reported for scam activity.");
    assert_eq!(json["status"], "SCAM");
}

#[tokio::test]
async fn test_upi_check_flags_test_ids_for_review() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/upi/check/test123@upi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["riskPercentage"], 50);
    assert_eq!(json["riskLevel"], "Medium");
    assert_eq!(json["reports"], 1);
    assert_eq!(json["status"], "SUSPICIOUS");
}

#[tokio::test]
async fn test_upi_check_clears_ordinary_ids() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/upi/check/alice@oksbi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["riskPercentage"], 10);
    assert_eq!(json["riskLevel"], "Low");
    assert_eq!(json["reports"], 0);
    assert_eq!(json["reason"], "No suspicious activity detected.");
    assert_eq!(json["status"], "SAFE");
}

#[tokio::test]
async fn test_upi_check_is_case_insensitive() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/upi/check/FRAUDSTER@upi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = response_json(response).await;
    assert_eq!(json["status"], "SCAM");
    assert_eq!(json["upiId"], "FRAUDSTER@upi");
}

// ============================================================================
// Request validation
// ============================================================================

#[tokio::test]
async fn test_process_audio_requires_file_or_transcript() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    let response = app
        .oneshot(json_request("/api/process-audio", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"], "invalid_evidence");
    assert_eq!(json["details"], "no audio file or transcript provided");
}

#[tokio::test]
async fn test_process_audio_rejects_unparseable_body() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/process-audio")
                .header("content-type", "text/plain")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"], "invalid_evidence");
}

#[tokio::test]
async fn test_process_audio_rejects_blank_transcript() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    let response = app
        .oneshot(json_request(
            "/api/process-audio",
            json!({"transcript": "   "}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"], "invalid_evidence");
}

#[tokio::test]
async fn test_text_analysis_requires_text() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    let response = app
        .oneshot(json_request("/api/analyze-text", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"], "invalid_evidence");
    assert_eq!(json["details"], "no text provided");
}

#[tokio::test]
async fn test_image_analysis_requires_image_field() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    // Field name is "file", not the expected "image"
    let response = app
        .oneshot(multipart_request(
            "/api/analyze-image",
            "file",
            "photo.png",
            "image/png",
            b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"], "invalid_evidence");
    assert!(json["details"].as_str().unwrap().contains("image"));
}

#[tokio::test]
async fn test_image_analysis_rejects_non_image_payload() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    // WAV bytes in the image field: magic sniffing disagrees with the claim
    let response = app
        .oneshot(multipart_request(
            "/api/analyze-image",
            "image",
            "photo.png",
            "image/png",
            WAV_BYTES,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"], "invalid_evidence");
    assert!(json["details"].as_str().unwrap().contains("image"));
}

#[tokio::test]
async fn test_video_analysis_rejects_empty_file() {
    let uploads = tempfile::tempdir().unwrap();
    let app = test_app(test_config(uploads.path()));

    let response = app
        .oneshot(multipart_request(
            "/api/analyze-video",
            "video",
            "clip.mp4",
            "video/mp4",
            b"",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"], "invalid_evidence");
    assert_eq!(json["details"], "Empty video payload");
}

#[tokio::test]
async fn test_oversized_evidence_rejected() {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = test_config(uploads.path());
    config.max_upload_bytes = 16;
    let app = test_app(config);

    // 64 bytes of audio against a 16 byte cap
    let mut payload = WAV_BYTES.to_vec();
    payload.resize(64, 0);

    let response = app
        .oneshot(multipart_request(
            "/api/process-audio",
            "audio",
            "call.wav",
            "audio/wav",
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = response_json(response).await;
    assert_eq!(json["error"], "invalid_evidence");
    assert_eq!(json["details"], "Payload of 64 bytes exceeds the 16 byte limit");
}

#[tokio::test]
async fn test_audio_upload_without_api_key_fails_internally() {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = test_config(uploads.path());
    config.transcription_api_key = None;
    let app = test_app(config);

    let response = app
        .oneshot(multipart_request(
            "/api/process-audio",
            "audio",
            "call.wav",
            "audio/wav",
            WAV_BYTES,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = response_json(response).await;
    assert_eq!(json["error"], "internal_error");
    assert!(json["details"].as_str().unwrap().contains("API key"));
}

#[tokio::test]
async fn test_transcript_json_works_without_transcription_provider_key() {
    let uploads = tempfile::tempdir().unwrap();
    let mut config = test_config(uploads.path());
    config.transcription_api_key = None;
    let app = test_app(config);

    // The transcript path never touches the transcription provider; with the
    // voice backend also down it degrades rather than erroring.
    let response = app
        .oneshot(json_request(
            "/api/process-audio",
            json!({"transcript": "call me back immediately"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["transcript"], "call me back immediately");
    assert_eq!(json["analysis"]["method"], "transcription_only");
}
