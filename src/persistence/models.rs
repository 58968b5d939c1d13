//! Database row models for the `vehicles` and `visits` tables.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Vehicle, VehicleId, VehicleToken, Visit, VisitId};

/// A row of the `vehicles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VehicleRow {
    /// Primary key.
    pub id: Uuid,
    /// Unique licence plate.
    pub plate_number: String,
    /// Owner name.
    pub owner_name: String,
    /// Unique scannable token.
    pub token: String,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Self {
            id: VehicleId::from_uuid(row.id),
            plate_number: row.plate_number,
            owner_name: row.owner_name,
            token: VehicleToken::new(row.token),
            registered_at: row.registered_at,
        }
    }
}

/// A row of the `visits` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VisitRow {
    /// Primary key.
    pub id: Uuid,
    /// Owning vehicle.
    pub vehicle_id: Uuid,
    /// Check-in timestamp.
    pub check_in_at: DateTime<Utc>,
    /// Check-out timestamp, `NULL` while open.
    pub check_out_at: Option<DateTime<Utc>>,
    /// Minutes parked, `NULL` while open.
    pub duration_minutes: Option<i64>,
    /// Fee charged, `NULL` while open.
    pub fee: Option<i64>,
    /// Open flag; at most one `TRUE` per vehicle.
    pub is_open: bool,
}

impl From<VisitRow> for Visit {
    fn from(row: VisitRow) -> Self {
        Self {
            id: VisitId::from_uuid(row.id),
            vehicle_id: VehicleId::from_uuid(row.vehicle_id),
            check_in_at: row.check_in_at,
            check_out_at: row.check_out_at,
            duration_minutes: row.duration_minutes,
            fee: row.fee,
            is_open: row.is_open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_row_maps_to_open_visit() {
        let row = VisitRow {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            check_in_at: Utc::now(),
            check_out_at: None,
            duration_minutes: None,
            fee: None,
            is_open: true,
        };
        let visit = Visit::from(row.clone());
        assert!(visit.is_open);
        assert_eq!(*visit.id.as_uuid(), row.id);
        assert_eq!(*visit.vehicle_id.as_uuid(), row.vehicle_id);
    }

    #[test]
    fn vehicle_row_keeps_token_verbatim() {
        let row = VehicleRow {
            id: Uuid::new_v4(),
            plate_number: "ABC-1234".to_string(),
            owner_name: "Jane Doe".to_string(),
            token: "CAR-00ff".to_string(),
            registered_at: Utc::now(),
        };
        let vehicle = Vehicle::from(row);
        assert_eq!(vehicle.token.as_str(), "CAR-00ff");
        assert_eq!(vehicle.plate_number, "ABC-1234");
    }
}
