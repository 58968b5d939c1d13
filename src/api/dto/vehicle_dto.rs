//! Vehicle registration and lookup DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::PaginationMeta;
use super::visit_dto::VisitDto;
use crate::domain::Vehicle;

/// Request body for `POST /vehicles`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterVehicleRequest {
    /// Licence plate; must not already be registered.
    pub plate_number: String,
    /// Name of the owner.
    pub owner_name: String,
}

/// Query filter for `GET /vehicles`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VehicleFilter {
    /// Exact plate to look up. Lists every vehicle when absent.
    pub plate: Option<String>,
}

impl VehicleFilter {
    /// Returns the trimmed plate, treating a blank one as absent.
    #[must_use]
    pub fn plate(&self) -> Option<&str> {
        self.plate.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

/// A registered vehicle and its scannable token.
#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleResponse {
    /// Vehicle identifier.
    pub vehicle_id: uuid::Uuid,
    /// Licence plate.
    pub plate_number: String,
    /// Owner name.
    pub owner_name: String,
    /// Token to encode into the vehicle's QR sticker.
    pub token: String,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            vehicle_id: vehicle.id.into(),
            plate_number: vehicle.plate_number,
            owner_name: vehicle.owner_name,
            token: vehicle.token.into_inner(),
            registered_at: vehicle.registered_at,
        }
    }
}

/// Response body for `GET /vehicles/{token}/visits`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleVisitsResponse {
    /// The vehicle.
    pub vehicle: VehicleResponse,
    /// Its visits, newest check-in first.
    pub visits: Vec<VisitDto>,
}

/// Paginated response for `GET /vehicles`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleListResponse {
    /// Vehicles, oldest registration first.
    pub data: Vec<VehicleResponse>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
