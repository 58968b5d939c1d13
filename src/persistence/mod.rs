//! Persistence layer: the storage contract and its adapters.
//!
//! [`VehicleRepository`] and [`VisitRepository`] are the only way the
//! registry and the lifecycle engine touch stored state. Two adapters
//! implement them: [`MemoryStore`] (process lifetime only) and
//! [`PostgresStore`] (durable, `sqlx::PgPool`).
//!
//! Both adapters enforce at most one open visit per vehicle at write
//! time, independently of any locking done by callers.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Fee, Vehicle, VehicleId, VehicleToken, Visit, VisitId};
use crate::error::ParkingError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Storage contract for vehicle records.
#[async_trait]
pub trait VehicleRepository: Send + Sync + fmt::Debug {
    /// Stores a newly registered vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::DuplicatePlate`] if the plate is taken,
    /// [`ParkingError::DuplicateToken`] if the token is taken, or
    /// [`ParkingError::Storage`] on adapter failure. Nothing is stored on
    /// error.
    async fn insert_vehicle(&self, vehicle: &Vehicle) -> Result<(), ParkingError>;

    /// Looks up the vehicle holding `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::Storage`] on adapter failure.
    async fn find_by_token(&self, token: &VehicleToken) -> Result<Option<Vehicle>, ParkingError>;

    /// Looks up a vehicle by plate.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::Storage`] on adapter failure.
    async fn find_by_plate(&self, plate_number: &str) -> Result<Option<Vehicle>, ParkingError>;

    /// Returns every registered vehicle, oldest registration first.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::Storage`] on adapter failure.
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, ParkingError>;
}

/// Storage contract for visits.
#[async_trait]
pub trait VisitRepository: Send + Sync + fmt::Debug {
    /// Returns the vehicle's open visit, if any, as last committed.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::Storage`] on adapter failure.
    async fn find_open_by_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<Option<Visit>, ParkingError>;

    /// Appends a new open visit.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::Storage`] on adapter failure, including
    /// when the vehicle already has an open visit. Nothing is stored on
    /// error.
    async fn create_visit(
        &self,
        vehicle_id: VehicleId,
        check_in_at: DateTime<Utc>,
    ) -> Result<Visit, ParkingError>;

    /// Closes an open visit, returning it in its closed state.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::VisitNotFound`] if no such visit exists,
    /// [`ParkingError::AlreadyClosed`] if it is not open, or
    /// [`ParkingError::Storage`] on adapter failure.
    async fn close_visit(
        &self,
        visit_id: VisitId,
        check_out_at: DateTime<Utc>,
        duration_minutes: i64,
        fee: Fee,
    ) -> Result<Visit, ParkingError>;

    /// Returns every visit, most recent check-in first.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::Storage`] on adapter failure.
    async fn list_visits(&self) -> Result<Vec<Visit>, ParkingError>;

    /// Returns one vehicle's visits, most recent check-in first.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::Storage`] on adapter failure.
    async fn list_visits_by_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<Vec<Visit>, ParkingError>;
}
