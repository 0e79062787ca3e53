//! Backend dispatch
//!
//! Sends evidence to an analysis backend in the request shape its descriptor
//! declares and hands back the raw JSON response for normalization. One
//! shared HTTP client with a bounded per-call timeout serves all backends.

use crate::models::EvidenceMetadata;
use crate::services::registry::BackendDescriptor;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const USER_AGENT: &str = "SafePay-EvidenceAnalysis/0.1.0";

/// Longest upstream body excerpt carried in an error
const MAX_BODY_EXCERPT: usize = 200;

/// Backend call failures
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Could not reach the backend at all (502)
    #[error("Backend unreachable: {0}")]
    Unavailable(String),

    /// Backend answered with a non-success status (echoed to the caller)
    #[error("Backend returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Backend answered 2xx but the body was not JSON (502)
    #[error("Backend response was not JSON: {0}")]
    MalformedResponse(String),
}

/// Outbound calls to the analysis backends
pub struct BackendDispatcher {
    http_client: reqwest::Client,
}

impl BackendDispatcher {
    pub fn new(request_timeout: Duration) -> Result<Self, safepay_common::Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                safepay_common::Error::Internal(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self { http_client })
    }

    /// POST a JSON body `{ <field>: text }` to the descriptor's backend
    pub async fn dispatch_text(
        &self,
        descriptor: &BackendDescriptor,
        text: &str,
    ) -> Result<Value, DispatchError> {
        let url = descriptor.url();
        let field = descriptor.request.field();
        debug!(url = %url, modality = %descriptor.modality, "Dispatching text to backend");

        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({ field: text }))
            .send()
            .await
            .map_err(|e| DispatchError::Unavailable(e.to_string()))?;

        read_json_response(response).await
    }

    /// POST a multipart form with one file part to the descriptor's backend
    pub async fn dispatch_file(
        &self,
        descriptor: &BackendDescriptor,
        bytes: Vec<u8>,
        metadata: &EvidenceMetadata,
    ) -> Result<Value, DispatchError> {
        let url = descriptor.url();
        debug!(
            url = %url,
            modality = %descriptor.modality,
            bytes = bytes.len(),
            "Dispatching file to backend"
        );

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(metadata.original_name.clone())
            .mime_str(metadata.mime_or_default())
            .map_err(|e| DispatchError::Unavailable(format!("invalid mime type: {e}")))?;
        let form =
            reqwest::multipart::Form::new().part(descriptor.request.field().to_string(), part);

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| DispatchError::Unavailable(e.to_string()))?;

        read_json_response(response).await
    }
}

/// Check the status and parse the body as JSON
async fn read_json_response(response: reqwest::Response) -> Result<Value, DispatchError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "Backend returned error status");
        return Err(DispatchError::Upstream {
            status: status.as_u16(),
            message: excerpt(&body),
        });
    }

    response
        .json()
        .await
        .map_err(|e| DispatchError::MalformedResponse(e.to_string()))
}

/// Upstream error bodies can be whole HTML pages; keep a short excerpt
fn excerpt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_BODY_EXCERPT {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX_BODY_EXCERPT).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatcher_creation() {
        assert!(BackendDispatcher::new(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_excerpt_passes_short_bodies_through() {
        assert_eq!(excerpt("service down"), "service down");
        assert_eq!(excerpt("  padded  "), "padded");
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let long = "x".repeat(1000);
        let short = excerpt(&long);
        assert_eq!(short.chars().count(), MAX_BODY_EXCERPT + 3);
        assert!(short.ends_with("..."));
    }
}
