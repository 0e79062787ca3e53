//! Audio evidence endpoint
//!
//! One route, two request shapes: a JSON body with a pre-transcribed call
//! skips straight to analysis, a multipart audio upload runs the full
//! transcription workflow first. Both answer with the transcript and its
//! verdict.

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::header::CONTENT_TYPE,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::read_file_field;
use crate::error::{ApiError, ApiResult};
use crate::models::Modality;
use crate::AppState;
use safepay_common::api::types::AnalysisResult;

/// JSON request carrying a pre-transcribed call
#[derive(Debug, Deserialize)]
pub struct TranscriptRequest {
    /// Transcript text of the suspicious call
    pub transcript: Option<String>,
}

/// Response for the audio path: the transcript plus its verdict
#[derive(Debug, Serialize)]
pub struct AudioAnalysisResponse {
    pub transcript: String,
    pub analysis: AnalysisResult,
}

/// POST /api/process-audio
///
/// Branches on the request Content-Type: `multipart/form-data` uploads an
/// `audio` file through transcription, anything else is read as a JSON
/// `{ "transcript": ... }` body.
pub async fn process_audio(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<AudioAnalysisResponse>> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(req, &()).await.map_err(|e| {
            ApiError::InvalidEvidence(format!("malformed multipart request: {e}"))
        })?;
        let (bytes, file_name, mime) = read_file_field(&mut multipart, "audio").await?;

        let submission = state.orchestrator.intake().binary_submission(
            Modality::Voice,
            bytes,
            &file_name,
            mime,
        )?;

        // Transcription polling aborts promptly if the process shuts down
        let cancel = state.shutdown.child_token();
        let (transcript, analysis) =
            state.orchestrator.analyze_audio(submission, &cancel).await?;
        Ok(Json(AudioAnalysisResponse {
            transcript,
            analysis,
        }))
    } else {
        let Json(body) = Json::<TranscriptRequest>::from_request(req, &())
            .await
            .map_err(|e| {
                ApiError::InvalidEvidence(format!(
                    "expected a JSON transcript body or a multipart audio upload: {e}"
                ))
            })?;
        let transcript = body.transcript.ok_or_else(|| {
            ApiError::InvalidEvidence("no audio file or transcript provided".to_string())
        })?;

        let submission = state
            .orchestrator
            .intake()
            .text_submission(Modality::Voice, transcript)?;
        let (transcript, analysis) = state.orchestrator.analyze_transcript(submission).await?;
        Ok(Json(AudioAnalysisResponse {
            transcript,
            analysis,
        }))
    }
}

/// Build audio analysis routes
pub fn audio_routes() -> Router<AppState> {
    Router::new().route("/api/process-audio", post(process_audio))
}
