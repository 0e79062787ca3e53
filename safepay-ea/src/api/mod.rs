//! HTTP API handlers for safepay-ea
//!
//! One file per route family. Handlers extract and validate request parts,
//! hand validated submissions to the orchestrator, and serialize its results;
//! no analysis logic lives here.

pub mod audio;
pub mod health;
pub mod image;
pub mod text;
pub mod upi;
pub mod video;
pub mod whatsapp;

pub use audio::audio_routes;
pub use health::health_routes;
pub use image::image_routes;
pub use text::text_routes;
pub use upi::upi_routes;
pub use video::video_routes;
pub use whatsapp::whatsapp_routes;

use crate::error::{ApiError, ApiResult};
use axum::extract::Multipart;

/// Read the named file field out of a multipart request.
///
/// Returns the file bytes, the uploaded filename (falling back to the field
/// name), and the declared content type. Fields with other names are skipped.
pub(crate) async fn read_file_field(
    multipart: &mut Multipart,
    field_name: &str,
) -> ApiResult<(Vec<u8>, String, Option<String>)> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::InvalidEvidence(format!("malformed multipart request: {e}"))
    })? {
        if field.name() != Some(field_name) {
            continue;
        }

        let file_name = field.file_name().unwrap_or(field_name).to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            ApiError::InvalidEvidence(format!("failed to read {field_name} field: {e}"))
        })?;

        return Ok((bytes.to_vec(), file_name, content_type));
    }

    Err(ApiError::InvalidEvidence(format!(
        "missing {field_name} file field"
    )))
}
