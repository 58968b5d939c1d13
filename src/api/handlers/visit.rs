//! Visit log handler.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{PaginationParams, VisitListResponse, VisitLogEntryDto};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ParkingError};

/// `GET /visits`: Paginated visit log, newest check-in first.
///
/// # Errors
///
/// Returns [`ParkingError::Storage`] if the store fails.
#[utoipa::path(
    get,
    path = "/api/v1/visits",
    tag = "Visits",
    summary = "List visits",
    description = "Returns every visit joined with its vehicle's plate and owner, most recent check-in first.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated visit log", body = VisitListResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse),
    )
)]
pub async fn list_visits(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ParkingError> {
    let entries = state.visit_log.entries().await?;
    let (page, pagination) = params.paginate(entries);
    Ok(Json(VisitListResponse {
        data: page.into_iter().map(VisitLogEntryDto::from).collect(),
        pagination,
    }))
}

/// Visit routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/visits", get(list_visits))
}
