//! Video evidence endpoint

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};

use crate::api::read_file_field;
use crate::error::ApiResult;
use crate::models::Modality;
use crate::AppState;
use safepay_common::api::types::AnalysisResult;

/// POST /api/analyze-video
pub async fn analyze_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<AnalysisResult>> {
    let (bytes, file_name, mime) = read_file_field(&mut multipart, "video").await?;

    let submission = state.orchestrator.intake().binary_submission(
        Modality::Video,
        bytes,
        &file_name,
        mime,
    )?;
    let verdict = state.orchestrator.analyze_video(submission).await?;
    Ok(Json(verdict))
}

/// Build video analysis routes
pub fn video_routes() -> Router<AppState> {
    Router::new().route("/api/analyze-video", post(analyze_video))
}
