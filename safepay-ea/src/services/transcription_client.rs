//! Speech-to-text provider client (AssemblyAI wire contract)
//!
//! Three-step workflow: upload the raw audio, request a transcript job, poll
//! the job until it reaches a terminal status. The poll loop sleeps before
//! each status check (a job is never ready instantly) and gives up after a
//! fixed number of attempts, so the total wait is bounded by
//! `attempts * interval` plus per-call time. One slow transcription suspends
//! only its own request task.

use crate::models::{TranscriptionJob, TranscriptionStatus};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const USER_AGENT: &str = "SafePay-EvidenceAnalysis/0.1.0";

/// Transcription workflow errors
#[derive(Debug, Error)]
pub enum TranscribeError {
    /// Audio upload to the provider failed
    #[error("Audio upload failed: {0}")]
    UploadFailed(String),

    /// Submitting or checking the transcript job failed
    #[error("Transcript request failed: {0}")]
    RequestFailed(String),

    /// The provider processed the job and reported failure, or completed
    /// with no usable text
    #[error("Transcription failed: {0}")]
    JobFailed(String),

    /// The job never reached a terminal status within the polling budget
    #[error("Transcription did not complete within {attempts} status checks")]
    Timeout { attempts: u32 },

    /// The request was cancelled while the workflow was in flight
    #[error("Transcription cancelled")]
    Cancelled,
}

/// Outcome of one status poll
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Queued or processing; poll again
    Pending,
    /// Terminal: transcript ready (text may still be absent)
    Completed(Option<String>),
    /// Terminal: provider reported a processing error
    Failed(String),
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptStatusResponse {
    status: Option<String>,
    text: Option<String>,
    error: Option<String>,
}

/// Speech-to-text provider client
pub struct AssemblyAiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl AssemblyAiClient {
    /// Create a client with a bounded per-call timeout.
    ///
    /// The per-call timeout caps each individual HTTP round trip; the polling
    /// budget (`max_poll_attempts` at `poll_interval` apart) caps the whole
    /// workflow.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        request_timeout: Duration,
        poll_interval: Duration,
        max_poll_attempts: u32,
    ) -> Result<Self, safepay_common::Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                safepay_common::Error::Internal(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http_client,
            base_url: trim_base_url(base_url.into()),
            api_key: api_key.into(),
            poll_interval,
            max_poll_attempts,
        })
    }

    /// Upload raw audio bytes to the provider.
    ///
    /// Returns the provider URL identifying the uploaded media.
    pub async fn upload_audio(&self, bytes: Vec<u8>) -> Result<String, TranscribeError> {
        debug!(bytes = bytes.len(), "Uploading audio for transcription");

        let response = self
            .http_client
            .post(format!("{}/upload", self.base_url))
            .header("authorization", &self.api_key)
            .header("content-type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| TranscribeError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscribeError::UploadFailed(format!(
                "provider returned {status}: {error_text}"
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::UploadFailed(e.to_string()))?;

        body.upload_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                TranscribeError::UploadFailed("response missing upload_url".to_string())
            })
    }

    /// Submit a transcript job for previously uploaded audio.
    ///
    /// Returns the provider-assigned job id.
    pub async fn request_transcript(&self, audio_url: &str) -> Result<String, TranscribeError> {
        let response = self
            .http_client
            .post(format!("{}/transcript", self.base_url))
            .header("authorization", &self.api_key)
            .json(&serde_json::json!({ "audio_url": audio_url }))
            .send()
            .await
            .map_err(|e| TranscribeError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscribeError::RequestFailed(format!(
                "provider returned {status}: {error_text}"
            )));
        }

        let body: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::RequestFailed(e.to_string()))?;

        body.id.filter(|id| !id.is_empty()).ok_or_else(|| {
            TranscribeError::RequestFailed("response missing transcript id".to_string())
        })
    }

    /// Check the status of a transcript job once
    pub async fn poll_transcript(
        &self,
        transcript_id: &str,
    ) -> Result<PollOutcome, TranscribeError> {
        let response = self
            .http_client
            .get(format!("{}/transcript/{}", self.base_url, transcript_id))
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| TranscribeError::RequestFailed(format!("status check failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TranscribeError::RequestFailed(format!(
                "status check returned {status}: {error_text}"
            )));
        }

        let body: TranscriptStatusResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::RequestFailed(format!("status check: {e}")))?;

        Ok(classify_status(body))
    }

    /// Run the full transcription workflow: upload, request, poll to a text.
    ///
    /// Sleeps `poll_interval` before each status check. After
    /// `max_poll_attempts` checks without a terminal status the workflow
    /// gives up with [`TranscribeError::Timeout`]. Cancelling `cancel` (or
    /// dropping the future) aborts promptly; the sleep and the poll both
    /// yield cooperatively, so a slow provider never ties up a worker thread.
    pub async fn transcribe(
        &self,
        audio_bytes: Vec<u8>,
        cancel: &CancellationToken,
    ) -> Result<String, TranscribeError> {
        let upload_url = self.upload_audio(audio_bytes).await?;
        let transcript_id = self.request_transcript(&upload_url).await?;
        let mut job = TranscriptionJob::new(transcript_id);

        info!(job_id = %job.external_id, "Transcription job submitted");

        for attempt in 1..=self.max_poll_attempts {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(job_id = %job.external_id, attempt, "Transcription cancelled");
                    return Err(TranscribeError::Cancelled);
                }
                _ = tokio::time::sleep(self.poll_interval) => {}
            }

            match self.poll_transcript(&job.external_id).await? {
                PollOutcome::Pending => {
                    debug!(job_id = %job.external_id, attempt, "Transcript still pending");
                }
                PollOutcome::Completed(text) => {
                    job.transition_to(TranscriptionStatus::Completed);
                    let text = text
                        .map(|t| t.trim().to_string())
                        .filter(|t| !t.is_empty());
                    return match text {
                        Some(text) => {
                            info!(
                                job_id = %job.external_id,
                                attempt,
                                chars = text.len(),
                                "Transcription completed"
                            );
                            job.text = Some(text.clone());
                            Ok(text)
                        }
                        None => Err(TranscribeError::JobFailed(
                            "completed job produced no text".to_string(),
                        )),
                    };
                }
                PollOutcome::Failed(detail) => {
                    job.transition_to(TranscriptionStatus::Failed);
                    warn!(job_id = %job.external_id, attempt, detail = %detail, "Transcription job failed");
                    return Err(TranscribeError::JobFailed(detail));
                }
            }
        }

        warn!(
            job_id = %job.external_id,
            attempts = self.max_poll_attempts,
            "Transcription polling timed out"
        );
        Err(TranscribeError::Timeout {
            attempts: self.max_poll_attempts,
        })
    }
}

/// Map a provider status body to a poll outcome.
///
/// The provider reports failures as both `"error"` and `"failed"` depending
/// on the job stage; anything that is not terminal counts as pending.
fn classify_status(body: TranscriptStatusResponse) -> PollOutcome {
    match body.status.as_deref() {
        Some("completed") => PollOutcome::Completed(body.text),
        Some("error") | Some("failed") => PollOutcome::Failed(
            body.error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "provider reported failure".to_string()),
        ),
        _ => PollOutcome::Pending,
    }
}

fn trim_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}
