//! Scan handler: check-in / check-out by token.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{ScanRequest, ScanResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ParkingError};

/// `POST /scan`: Process a scanned token.
///
/// # Errors
///
/// Returns [`ParkingError::VehicleNotFound`] for an unknown token or
/// [`ParkingError::Storage`] if the store fails.
#[utoipa::path(
    post,
    path = "/api/v1/scan",
    tag = "Scans",
    summary = "Scan a vehicle token",
    description = "Checks the vehicle in if it has no open visit, otherwise checks it out and charges the session fee.",
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Checked in or out", body = ScanResponse),
        (status = 400, description = "Missing token", body = ErrorResponse),
        (status = 404, description = "Unknown token", body = ErrorResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse),
    )
)]
pub async fn scan(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> Result<impl IntoResponse, ParkingError> {
    let token = req.token()?;
    let result = state.engine.process_scan(&token).await?;
    Ok(Json(ScanResponse::new(result, &state.fee_currency)))
}

/// Scan routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/scan", post(scan))
}
