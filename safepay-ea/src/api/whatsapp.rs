//! WhatsApp screenshot endpoint

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

/// POST /api/analyze-whatsapp
pub async fn analyze_whatsapp(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<AnalysisResult>> {
    let (bytes, file_name, mime) = read_file_field(&mut multipart, "screenshot").await?;

    let submission = state.orchestrator.intake().binary_submission(
        Modality::Screenshot,
        bytes,
        &file_name,
        mime,
    )?;
    let verdict = state.orchestrator.analyze_screenshot(submission).await?;
    Ok(Json(verdict))
}

/// Build WhatsApp screenshot analysis routes
pub fn whatsapp_routes() -> Router<AppState> {
    Router::new().route("/api/analyze-whatsapp", post(analyze_whatsapp))
}
