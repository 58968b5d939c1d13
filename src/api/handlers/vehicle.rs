//! Vehicle handlers: register, list and look up, resolve by token, visit
//! history.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    PaginationParams, RegisterVehicleRequest, VehicleFilter, VehicleListResponse,
    VehicleResponse, VehicleVisitsResponse, VisitDto, parse_token,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, ParkingError};

/// `POST /vehicles`: Register a vehicle and issue its token.
///
/// # Errors
///
/// Returns [`ParkingError::InvalidRequest`] for blank fields or
/// [`ParkingError::DuplicatePlate`] if the plate is already registered.
#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    summary = "Register a vehicle",
    description = "Registers a vehicle under a unique plate and returns the opaque token to encode into its QR sticker.",
    request_body = RegisterVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = VehicleResponse),
        (status = 400, description = "Missing plate or owner", body = ErrorResponse),
        (status = 409, description = "Plate already registered", body = ErrorResponse),
    )
)]
pub async fn register_vehicle(
    State(state): State<AppState>,
    Json(req): Json<RegisterVehicleRequest>,
) -> Result<impl IntoResponse, ParkingError> {
    let vehicle = state
        .registry
        .register(&req.plate_number, &req.owner_name)
        .await?;
    Ok((StatusCode::CREATED, Json(VehicleResponse::from(vehicle))))
}

/// `GET /vehicles`: List registered vehicles, optionally by plate.
///
/// # Errors
///
/// Returns [`ParkingError::Storage`] if the store fails.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    summary = "List vehicles",
    description = "Returns registered vehicles, oldest registration first. With `plate`, returns at most the one vehicle holding that plate.",
    params(VehicleFilter, PaginationParams),
    responses(
        (status = 200, description = "Paginated vehicles", body = VehicleListResponse),
        (status = 503, description = "Storage unavailable", body = ErrorResponse),
    )
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(filter): Query<VehicleFilter>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, ParkingError> {
    let vehicles: Vec<_> = match filter.plate() {
        Some(plate) => state
            .registry
            .find_by_plate(plate)
            .await?
            .into_iter()
            .collect(),
        None => state.registry.list().await?,
    };
    let (page, pagination) = params.paginate(vehicles);
    Ok(Json(VehicleListResponse {
        data: page.into_iter().map(VehicleResponse::from).collect(),
        pagination,
    }))
}

/// `GET /vehicles/{token}`: Resolve a token to its vehicle.
///
/// # Errors
///
/// Returns [`ParkingError::VehicleNotFound`] for an unknown token.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{token}",
    tag = "Vehicles",
    summary = "Resolve a vehicle token",
    params(
        ("token" = String, Path, description = "Vehicle token"),
    ),
    responses(
        (status = 200, description = "Vehicle found", body = VehicleResponse),
        (status = 404, description = "Unknown token", body = ErrorResponse),
    )
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ParkingError> {
    let vehicle = state
        .registry
        .resolve_by_token(&parse_token(&token)?)
        .await?;
    Ok(Json(VehicleResponse::from(vehicle)))
}

/// `GET /vehicles/{token}/visits`: A vehicle's visit history.
///
/// # Errors
///
/// Returns [`ParkingError::VehicleNotFound`] for an unknown token.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{token}/visits",
    tag = "Vehicles",
    summary = "List a vehicle's visits",
    description = "Returns the vehicle and all of its visits, most recent check-in first.",
    params(
        ("token" = String, Path, description = "Vehicle token"),
    ),
    responses(
        (status = 200, description = "Visit history", body = VehicleVisitsResponse),
        (status = 404, description = "Unknown token", body = ErrorResponse),
    )
)]
pub async fn vehicle_visits(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ParkingError> {
    let (vehicle, visits) = state
        .engine
        .visits_for_token(&parse_token(&token)?)
        .await?;
    Ok(Json(VehicleVisitsResponse {
        vehicle: VehicleResponse::from(vehicle),
        visits: visits.into_iter().map(VisitDto::from).collect(),
    }))
}

/// Vehicle routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vehicles", post(register_vehicle).get(list_vehicles))
        .route("/vehicles/{token}", get(get_vehicle))
        .route("/vehicles/{token}/visits", get(vehicle_visits))
}
