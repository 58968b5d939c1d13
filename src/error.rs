//! Parking error types with HTTP status code mapping.
//!
//! [`ParkingError`] is the single error type of the crate. The domain
//! variants are the outcomes collaborators react to; each one also maps
//! to an HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{VehicleId, VisitId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "vehicle not found for token CAR-...",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Every failure the registry, store and lifecycle engine can report.
///
/// # Error Code Ranges
///
/// | Range     | Category              | HTTP Status                   |
/// |-----------|-----------------------|-------------------------------|
/// | 1000–1999 | Validation            | 400 Bad Request               |
/// | 2000–2999 | Not Found / Conflict  | 404 Not Found / 409 Conflict  |
/// | 3000–3999 | Server / Invariant    | 500 / 503                     |
#[derive(Debug, thiserror::Error)]
pub enum ParkingError {
    /// A vehicle with this plate is already registered.
    #[error("plate already registered: {0}")]
    DuplicatePlate(String),

    /// The generated token is already held by another vehicle.
    #[error("token already issued")]
    DuplicateToken,

    /// No vehicle holds the scanned token.
    #[error("vehicle not found for token {0}")]
    VehicleNotFound(String),

    /// A close referenced a visit that does not exist.
    #[error("visit not found: {0}")]
    VisitNotFound(VisitId),

    /// A close referenced a visit that is no longer open.
    #[error("visit already closed: {0}")]
    AlreadyClosed(VisitId),

    /// The storage adapter failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Request validation failed at the boundary.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ParkingError {
    /// Storage error for a second open visit on the same vehicle.
    #[must_use]
    pub fn open_visit_exists(vehicle_id: VehicleId) -> Self {
        Self::Storage(format!("vehicle {vehicle_id} already has an open visit"))
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::VehicleNotFound(_) => 2001,
            Self::DuplicatePlate(_) => 2002,
            Self::DuplicateToken => 2003,
            Self::Internal(_) => 3000,
            Self::Storage(_) => 3001,
            Self::VisitNotFound(_) => 3002,
            Self::AlreadyClosed(_) => 3003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::VehicleNotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicatePlate(_) | Self::DuplicateToken => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::VisitNotFound(_) | Self::AlreadyClosed(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns `true` for failures that mean the one-open-visit invariant
    /// was broken somewhere.
    #[must_use]
    pub const fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::VisitNotFound(_) | Self::AlreadyClosed(_))
    }
}

impl From<sqlx::Error> for ParkingError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl IntoResponse for ParkingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
