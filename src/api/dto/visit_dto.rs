//! Visit DTOs for the scan, history and log endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::Visit;
use crate::service::{VisitLogEntry, VisitStatus};

/// A single visit.
#[derive(Debug, Serialize, ToSchema)]
pub struct VisitDto {
    /// Visit identifier.
    pub visit_id: uuid::Uuid,
    /// Owning vehicle.
    pub vehicle_id: uuid::Uuid,
    /// Check-in timestamp.
    pub check_in_at: DateTime<Utc>,
    /// Check-out timestamp, absent while open.
    pub check_out_at: Option<DateTime<Utc>>,
    /// Whole minutes parked, absent while open.
    pub duration_minutes: Option<i64>,
    /// Fee charged, absent while open.
    pub fee: Option<i64>,
    /// Whether the vehicle is still on the lot.
    pub is_open: bool,
}

impl From<Visit> for VisitDto {
    fn from(visit: Visit) -> Self {
        Self {
            visit_id: visit.id.into(),
            vehicle_id: visit.vehicle_id.into(),
            check_in_at: visit.check_in_at,
            check_out_at: visit.check_out_at,
            duration_minutes: visit.duration_minutes,
            fee: visit.fee,
            is_open: visit.is_open,
        }
    }
}

/// One row of the visit log.
#[derive(Debug, Serialize, ToSchema)]
pub struct VisitLogEntryDto {
    /// The visit.
    #[serde(flatten)]
    pub visit: VisitDto,
    /// Plate of the visiting vehicle.
    pub plate_number: String,
    /// Owner of the visiting vehicle.
    pub owner_name: String,
    /// Whether the vehicle is still on the lot.
    pub status: VisitStatus,
}

impl From<VisitLogEntry> for VisitLogEntryDto {
    fn from(entry: VisitLogEntry) -> Self {
        Self {
            visit: VisitDto::from(entry.visit),
            plate_number: entry.plate_number,
            owner_name: entry.owner_name,
            status: entry.status,
        }
    }
}

/// Paginated response for `GET /visits`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VisitListResponse {
    /// Visit log rows, newest check-in first.
    pub data: Vec<VisitLogEntryDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
