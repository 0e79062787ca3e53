//! Document image endpoint
//!
//! Two-step path: the document service extracts text from the image, then
//! the extracted text goes through the text prediction backend. The caller
//! sees a single verdict.

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

/// POST /api/analyze-image
pub async fn analyze_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<AnalysisResult>> {
    let (bytes, file_name, mime) = read_file_field(&mut multipart, "image").await?;

    let submission = state.orchestrator.intake().binary_submission(
        Modality::Image,
        bytes,
        &file_name,
        mime,
    )?;
    let verdict = state.orchestrator.analyze_image(submission).await?;
    Ok(Json(verdict))
}

/// Build image analysis routes
pub fn image_routes() -> Router<AppState> {
    Router::new().route("/api/analyze-image", post(analyze_image))
}
