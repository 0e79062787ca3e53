//! UPI ID risk check endpoint

use axum::{
    extract::Path,
    routing::get,
    Json, Router,
};

use crate::services::upi::{check_upi_id, UpiRiskReport};
use crate::AppState;

/// GET /api/upi/check/:upi_id
pub async fn check_upi(Path(upi_id): Path<String>) -> Json<UpiRiskReport> {
    Json(check_upi_id(&upi_id))
}

/// Build UPI risk check routes
pub fn upi_routes() -> Router<AppState> {
    Router::new().route("/api/upi/check/:upi_id", get(check_upi))
}
