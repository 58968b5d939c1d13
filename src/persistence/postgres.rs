//! PostgreSQL implementation of the storage contract.
//!
//! Uniqueness of plates, tokens and open visits is enforced by the
//! schema (see `migrations/`); this adapter translates the resulting
//! constraint violations into [`ParkingError`] variants.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{VehicleRow, VisitRow};
use super::{VehicleRepository, VisitRepository};
use crate::config::ParkingConfig;
use crate::domain::{Fee, Vehicle, VehicleId, VehicleToken, Visit, VisitId};
use crate::error::ParkingError;

/// Unique constraint on `vehicles.plate_number`.
pub const PLATE_CONSTRAINT: &str = "vehicles_plate_number_key";
/// Unique constraint on `vehicles.token`.
pub const TOKEN_CONSTRAINT: &str = "vehicles_token_key";
/// Partial unique index allowing one open visit per vehicle.
pub const OPEN_VISIT_INDEX: &str = "visits_one_open_per_vehicle";

const VEHICLE_COLUMNS: &str = "id, plate_number, owner_name, token, registered_at";
const VISIT_COLUMNS: &str =
    "id, vehicle_id, check_in_at, check_out_at, duration_minutes, fee, is_open";

/// PostgreSQL-backed storage using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::Storage`] if the database is unreachable.
    pub async fn connect(config: &ParkingConfig) -> Result<Self, ParkingError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::Storage`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), ParkingError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ParkingError::Storage(e.to_string()))
    }

}

/// Maps a violated unique constraint to the domain error it stands for.
///
/// `plate_number` is the plate of the row being inserted, and
/// `vehicle_id` the vehicle of the visit being opened.
#[must_use]
pub fn constraint_error(
    constraint: &str,
    plate_number: &str,
    vehicle_id: Option<VehicleId>,
) -> Option<ParkingError> {
    match constraint {
        PLATE_CONSTRAINT => Some(ParkingError::DuplicatePlate(plate_number.to_string())),
        TOKEN_CONSTRAINT => Some(ParkingError::DuplicateToken),
        OPEN_VISIT_INDEX => vehicle_id.map(ParkingError::open_visit_exists),
        _ => None,
    }
}

/// Converts a `sqlx` error, classifying known unique violations.
fn classify(err: sqlx::Error, plate_number: &str, vehicle_id: Option<VehicleId>) -> ParkingError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
        && let Some(mapped) = db_err
            .constraint()
            .and_then(|c| constraint_error(c, plate_number, vehicle_id))
    {
        return mapped;
    }
    ParkingError::from(err)
}

#[async_trait]
impl VehicleRepository for PostgresStore {
    async fn insert_vehicle(&self, vehicle: &Vehicle) -> Result<(), ParkingError> {
        sqlx::query(
            "INSERT INTO vehicles (id, plate_number, owner_name, token, registered_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(vehicle.id.as_uuid())
        .bind(&vehicle.plate_number)
        .bind(&vehicle.owner_name)
        .bind(vehicle.token.as_str())
        .bind(vehicle.registered_at)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, &vehicle.plate_number, None))?;
        Ok(())
    }

    async fn find_by_token(&self, token: &VehicleToken) -> Result<Option<Vehicle>, ParkingError> {
        let row = sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE token = $1"
        ))
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Vehicle::from))
    }

    async fn find_by_plate(&self, plate_number: &str) -> Result<Option<Vehicle>, ParkingError> {
        let row = sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE plate_number = $1"
        ))
        .bind(plate_number)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Vehicle::from))
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, ParkingError> {
        let rows = sqlx::query_as::<_, VehicleRow>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles ORDER BY registered_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Vehicle::from).collect())
    }
}

#[async_trait]
impl VisitRepository for PostgresStore {
    async fn find_open_by_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<Option<Visit>, ParkingError> {
        let row = sqlx::query_as::<_, VisitRow>(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits WHERE vehicle_id = $1 AND is_open"
        ))
        .bind(vehicle_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Visit::from))
    }

    async fn create_visit(
        &self,
        vehicle_id: VehicleId,
        check_in_at: DateTime<Utc>,
    ) -> Result<Visit, ParkingError> {
        let visit = Visit::open(vehicle_id, check_in_at);
        let row = sqlx::query_as::<_, VisitRow>(&format!(
            "INSERT INTO visits (id, vehicle_id, check_in_at, is_open) \
             VALUES ($1, $2, $3, TRUE) RETURNING {VISIT_COLUMNS}"
        ))
        .bind(visit.id.as_uuid())
        .bind(vehicle_id.as_uuid())
        .bind(check_in_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "", Some(vehicle_id)))?;
        Ok(Visit::from(row))
    }

    async fn close_visit(
        &self,
        visit_id: VisitId,
        check_out_at: DateTime<Utc>,
        duration_minutes: i64,
        fee: Fee,
    ) -> Result<Visit, ParkingError> {
        let updated = sqlx::query_as::<_, VisitRow>(&format!(
            "UPDATE visits \
             SET check_out_at = $2, duration_minutes = $3, fee = $4, is_open = FALSE \
             WHERE id = $1 AND is_open RETURNING {VISIT_COLUMNS}"
        ))
        .bind(visit_id.as_uuid())
        .bind(check_out_at)
        .bind(duration_minutes)
        .bind(fee)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = updated {
            return Ok(Visit::from(row));
        }

        // Zero rows: either the visit is missing or someone closed it first.
        let exists = sqlx::query_scalar::<_, bool>("SELECT is_open FROM visits WHERE id = $1")
            .bind(visit_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        match exists {
            None => Err(ParkingError::VisitNotFound(visit_id)),
            Some(_) => Err(ParkingError::AlreadyClosed(visit_id)),
        }
    }

    async fn list_visits(&self) -> Result<Vec<Visit>, ParkingError> {
        let rows = sqlx::query_as::<_, VisitRow>(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits ORDER BY check_in_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Visit::from).collect())
    }

    async fn list_visits_by_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<Vec<Visit>, ParkingError> {
        let rows = sqlx::query_as::<_, VisitRow>(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits WHERE vehicle_id = $1 ORDER BY check_in_at DESC"
        ))
        .bind(vehicle_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Visit::from).collect())
    }
}
