//! Analysis orchestration
//!
//! One orchestrator instance serves the whole process. Each public operation
//! handles a single evidence submission end to end: route it through the
//! registry, run the transcription workflow when the modality needs one,
//! dispatch to the analysis backend, and normalize the response. Failures on
//! the audio path after a transcript exists are masked by the degraded-path
//! policy; everything else surfaces as a typed error.

use crate::error::{ApiError, ApiResult};
use crate::models::{EvidenceMetadata, EvidencePayload, EvidenceSubmission, Modality};
use crate::services::dispatcher::BackendDispatcher;
use crate::services::fallback::{degraded_result, DegradedPath};
use crate::services::intake::EvidenceIntake;
use crate::services::normalizer::extracted_text;
use crate::services::registry::BackendRegistry;
use crate::services::transcription_client::AssemblyAiClient;
use safepay_common::api::types::AnalysisResult;
use safepay_common::config::GatewayConfig;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Per-request analysis orchestration
pub struct AnalysisOrchestrator {
    registry: BackendRegistry,
    dispatcher: BackendDispatcher,
    transcriber: AssemblyAiClient,
    intake: EvidenceIntake,
    transcription_configured: bool,
    last_error: Arc<RwLock<Option<String>>>,
}

impl AnalysisOrchestrator {
    /// Build the orchestrator from resolved configuration.
    ///
    /// `last_error` is shared with the health endpoint; the orchestrator
    /// records upstream and internal failures there (caller mistakes are
    /// not recorded).
    pub fn new(
        config: &GatewayConfig,
        last_error: Arc<RwLock<Option<String>>>,
    ) -> Result<Self, safepay_common::Error> {
        let transcriber = AssemblyAiClient::new(
            config.transcription_base_url.clone(),
            config.transcription_api_key.clone().unwrap_or_default(),
            config.request_timeout(),
            config.poll_interval(),
            config.max_poll_attempts,
        )?;

        Ok(Self {
            registry: BackendRegistry::from_config(config),
            dispatcher: BackendDispatcher::new(config.request_timeout())?,
            transcriber,
            intake: EvidenceIntake::new(config),
            transcription_configured: config.transcription_api_key.is_some(),
            last_error,
        })
    }

    /// Evidence validation, for handlers building submissions
    pub fn intake(&self) -> &EvidenceIntake {
        &self.intake
    }

    /// Analyze a caller-supplied call transcript.
    ///
    /// Skips the transcription workflow entirely. The transcript counts as
    /// obtained, so an analysis failure yields a degraded verdict, never an
    /// error response.
    pub async fn analyze_transcript(
        &self,
        submission: EvidenceSubmission,
    ) -> ApiResult<(String, AnalysisResult)> {
        let request_id = Uuid::new_v4();
        let transcript = text_parts(submission)?;
        info!(
            request_id = %request_id,
            modality = "voice",
            chars = transcript.len(),
            "Analyzing caller-supplied transcript"
        );

        let verdict = self.voice_verdict(request_id, &transcript).await?;
        Ok((transcript, verdict))
    }

    /// Run the full audio path: stage, transcribe, analyze.
    ///
    /// Failures before a transcript exists surface as typed errors; once a
    /// transcript is in hand, analysis failures are masked by the fallback
    /// policy. The staged file is removed on every path.
    pub async fn analyze_audio(
        &self,
        submission: EvidenceSubmission,
        cancel: &CancellationToken,
    ) -> ApiResult<(String, AnalysisResult)> {
        let request_id = Uuid::new_v4();

        if !self.transcription_configured {
            let message = "transcription provider API key not configured";
            self.record_error(message).await;
            return Err(ApiError::Internal(message.to_string()));
        }

        let staged = self.surface(self.intake.stage(&submission)).await?;
        info!(
            request_id = %request_id,
            modality = "voice",
            file = %staged.path().display(),
            "Starting transcription workflow"
        );

        let audio_bytes = self.surface(std::fs::read(staged.path())).await?;
        let transcript = self
            .surface(self.transcriber.transcribe(audio_bytes, cancel).await)
            .await?;
        drop(staged);

        let verdict = self.voice_verdict(request_id, &transcript).await?;
        Ok((transcript, verdict))
    }

    /// Analyze free text evidence; backend failures surface
    pub async fn analyze_text(&self, submission: EvidenceSubmission) -> ApiResult<AnalysisResult> {
        let request_id = Uuid::new_v4();
        let descriptor = self.registry.resolve(Modality::Text)?;
        let text = text_parts(submission)?;
        info!(
            request_id = %request_id,
            modality = "text",
            chars = text.len(),
            "Analyzing text evidence"
        );

        let raw = self
            .surface(self.dispatcher.dispatch_text(descriptor, &text).await)
            .await?;
        Ok(descriptor.normalizer.normalize(&raw))
    }

    /// Analyze a document image: OCR extraction, then the text path.
    ///
    /// An extraction that comes back without readable text is the caller's
    /// problem (unreadable image), reported as invalid evidence.
    pub async fn analyze_image(&self, submission: EvidenceSubmission) -> ApiResult<AnalysisResult> {
        let request_id = Uuid::new_v4();
        let ocr = self.registry.resolve(Modality::Image)?;
        let (bytes, metadata) = file_parts(submission)?;
        info!(
            request_id = %request_id,
            modality = "image",
            bytes = bytes.len(),
            "Extracting text from image evidence"
        );

        let raw = self
            .surface(self.dispatcher.dispatch_file(ocr, bytes, &metadata).await)
            .await?;
        let text = extracted_text(&raw).ok_or_else(|| {
            ApiError::InvalidEvidence("no readable text in image".to_string())
        })?;
        debug!(request_id = %request_id, chars = text.len(), "OCR extraction produced text");

        let text_backend = self.registry.resolve(Modality::Text)?;
        let raw = self
            .surface(self.dispatcher.dispatch_text(text_backend, &text).await)
            .await?;
        Ok(ocr.normalizer.normalize(&raw))
    }

    /// Analyze a video clip; backend failures surface
    pub async fn analyze_video(&self, submission: EvidenceSubmission) -> ApiResult<AnalysisResult> {
        self.file_analysis(Modality::Video, submission).await
    }

    /// Analyze a WhatsApp chat screenshot; backend failures surface
    pub async fn analyze_screenshot(
        &self,
        submission: EvidenceSubmission,
    ) -> ApiResult<AnalysisResult> {
        self.file_analysis(Modality::Screenshot, submission).await
    }

    /// Single-dispatch path for binary evidence
    async fn file_analysis(
        &self,
        modality: Modality,
        submission: EvidenceSubmission,
    ) -> ApiResult<AnalysisResult> {
        let request_id = Uuid::new_v4();
        let descriptor = self.registry.resolve(modality)?;
        let (bytes, metadata) = file_parts(submission)?;
        info!(
            request_id = %request_id,
            modality = %modality,
            bytes = bytes.len(),
            "Dispatching evidence for analysis"
        );

        let raw = self
            .surface(
                self.dispatcher
                    .dispatch_file(descriptor, bytes, &metadata)
                    .await,
            )
            .await?;
        Ok(descriptor.normalizer.normalize(&raw))
    }

    /// Voice backend verdict for an obtained transcript.
    ///
    /// Masks dispatch failures: the caller already has a transcript, so they
    /// get a degraded verdict instead of an error.
    async fn voice_verdict(
        &self,
        request_id: Uuid,
        transcript: &str,
    ) -> ApiResult<AnalysisResult> {
        let descriptor = self.registry.resolve(Modality::Voice)?;

        match self.dispatcher.dispatch_text(descriptor, transcript).await {
            Ok(raw) => Ok(descriptor.normalizer.normalize(&raw)),
            Err(e) => {
                self.record_error(&e.to_string()).await;
                warn!(
                    request_id = %request_id,
                    error = %e,
                    "Voice analysis failed, returning degraded verdict"
                );
                Ok(degraded_result(DegradedPath::for_analysis_failure(true)))
            }
        }
    }

    /// Record the failure for health diagnostics, then convert it
    async fn surface<T, E>(&self, result: Result<T, E>) -> ApiResult<T>
    where
        E: std::fmt::Display + Into<ApiError>,
    {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                self.record_error(&e.to_string()).await;
                Err(e.into())
            }
        }
    }

    async fn record_error(&self, message: &str) {
        let mut last_error = self.last_error.write().await;
        *last_error = Some(message.to_string());
    }
}

/// Split a binary submission into dispatchable parts
fn file_parts(submission: EvidenceSubmission) -> ApiResult<(Vec<u8>, EvidenceMetadata)> {
    match submission.payload {
        EvidencePayload::Binary(bytes) => Ok((bytes, submission.metadata)),
        EvidencePayload::Text(_) => Err(ApiError::Internal(
            "expected binary evidence".to_string(),
        )),
    }
}

/// Pull the validated text out of a text-borne submission
fn text_parts(submission: EvidenceSubmission) -> ApiResult<String> {
    match submission.payload {
        EvidencePayload::Text(text) => Ok(text),
        EvidencePayload::Binary(_) => Err(ApiError::Internal(
            "expected text evidence".to_string(),
        )),
    }
}
