//! Text evidence endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::models::Modality;
use crate::AppState;
use safepay_common::api::types::AnalysisResult;

/// JSON request carrying free text evidence (SMS, chat, email body)
#[derive(Debug, Deserialize)]
pub struct TextAnalysisRequest {
    pub text: Option<String>,
}

/// POST /api/analyze-text
pub async fn analyze_text(
    State(state): State<AppState>,
    Json(body): Json<TextAnalysisRequest>,
) -> ApiResult<Json<AnalysisResult>> {
    let text = body
        .text
        .ok_or_else(|| ApiError::InvalidEvidence("no text provided".to_string()))?;

    let submission = state
        .orchestrator
        .intake()
        .text_submission(Modality::Text, text)?;
    let verdict = state.orchestrator.analyze_text(submission).await?;
    Ok(Json(verdict))
}

/// Build text analysis routes
pub fn text_routes() -> Router<AppState> {
    Router::new().route("/api/analyze-text", post(analyze_text))
}
