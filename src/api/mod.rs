//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; `/health` sits at the
//! root. With the `swagger-ui` feature the OpenAPI document is served at
//! `/api-docs/openapi.json` and browsable at `/swagger-ui`.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "parking-gateway",
        description = "Vehicle registration and QR-token check-in/check-out for a parking lot."
    ),
    paths(
        handlers::vehicle::register_vehicle,
        handlers::vehicle::list_vehicles,
        handlers::vehicle::get_vehicle,
        handlers::vehicle::vehicle_visits,
        handlers::scan::scan,
        handlers::visit::list_visits,
        handlers::system::health_handler,
    ),
    components(schemas(
        dto::RegisterVehicleRequest,
        dto::VehicleResponse,
        dto::VehicleVisitsResponse,
        dto::VehicleListResponse,
        dto::VisitDto,
        dto::VisitLogEntryDto,
        crate::service::VisitStatus,
        dto::VisitListResponse,
        dto::PaginationMeta,
        dto::ScanRequest,
        dto::ScanResponse,
        handlers::system::HealthResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "Vehicles", description = "Registration and token lookup"),
        (name = "Scans", description = "Check-in / check-out"),
        (name = "Visits", description = "Visit log"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    with_docs(
        Router::new()
            .nest("/api/v1", handlers::routes())
            .merge(handlers::system::routes()),
    )
}

#[cfg(feature = "swagger-ui")]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
}

#[cfg(not(feature = "swagger-ui"))]
fn with_docs(router: Router<AppState>) -> Router<AppState> {
    router
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/vehicles",
            "/api/v1/vehicles/{token}",
            "/api/v1/vehicles/{token}/visits",
            "/api/v1/scan",
            "/api/v1/visits",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
