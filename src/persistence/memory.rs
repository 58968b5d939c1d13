//! In-memory storage adapter.
//!
//! [`MemoryStore`] keeps vehicles and visits in `HashMap`s behind
//! [`tokio::sync::RwLock`]s. Secondary indexes give constant-time lookups
//! by token, by plate, and of a vehicle's open visit. Contents live as
//! long as the process.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{VehicleRepository, VisitRepository};
use crate::domain::{Fee, Vehicle, VehicleId, VehicleToken, Visit, VisitId};
use crate::error::ParkingError;

#[derive(Debug, Default)]
struct VehicleTable {
    by_id: HashMap<VehicleId, Vehicle>,
    by_token: HashMap<VehicleToken, VehicleId>,
    by_plate: HashMap<String, VehicleId>,
}

#[derive(Debug, Default)]
struct VisitTable {
    by_id: HashMap<VisitId, Visit>,
    open_by_vehicle: HashMap<VehicleId, VisitId>,
}

/// Process-lifetime implementation of both storage contracts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    vehicles: RwLock<VehicleTable>,
    visits: RwLock<VisitTable>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered vehicles.
    pub async fn vehicle_count(&self) -> usize {
        self.vehicles.read().await.by_id.len()
    }

    /// Returns the number of stored visits, open or closed.
    pub async fn visit_count(&self) -> usize {
        self.visits.read().await.by_id.len()
    }

    /// Returns the number of currently open visits.
    pub async fn open_visit_count(&self) -> usize {
        self.visits.read().await.open_by_vehicle.len()
    }
}

fn newest_first(mut visits: Vec<Visit>) -> Vec<Visit> {
    visits.sort_by(|a, b| b.check_in_at.cmp(&a.check_in_at));
    visits
}

#[async_trait]
impl VehicleRepository for MemoryStore {
    async fn insert_vehicle(&self, vehicle: &Vehicle) -> Result<(), ParkingError> {
        let mut table = self.vehicles.write().await;
        if table.by_plate.contains_key(&vehicle.plate_number) {
            return Err(ParkingError::DuplicatePlate(vehicle.plate_number.clone()));
        }
        if table.by_token.contains_key(&vehicle.token) {
            return Err(ParkingError::DuplicateToken);
        }
        table
            .by_plate
            .insert(vehicle.plate_number.clone(), vehicle.id);
        table.by_token.insert(vehicle.token.clone(), vehicle.id);
        table.by_id.insert(vehicle.id, vehicle.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &VehicleToken) -> Result<Option<Vehicle>, ParkingError> {
        let table = self.vehicles.read().await;
        Ok(table
            .by_token
            .get(token)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn find_by_plate(&self, plate_number: &str) -> Result<Option<Vehicle>, ParkingError> {
        let table = self.vehicles.read().await;
        Ok(table
            .by_plate
            .get(plate_number)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, ParkingError> {
        let table = self.vehicles.read().await;
        let mut vehicles: Vec<Vehicle> = table.by_id.values().cloned().collect();
        vehicles.sort_by(|a, b| a.registered_at.cmp(&b.registered_at));
        Ok(vehicles)
    }
}

#[async_trait]
impl VisitRepository for MemoryStore {
    async fn find_open_by_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<Option<Visit>, ParkingError> {
        let table = self.visits.read().await;
        Ok(table
            .open_by_vehicle
            .get(&vehicle_id)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn create_visit(
        &self,
        vehicle_id: VehicleId,
        check_in_at: DateTime<Utc>,
    ) -> Result<Visit, ParkingError> {
        let mut table = self.visits.write().await;
        if table.open_by_vehicle.contains_key(&vehicle_id) {
            return Err(ParkingError::open_visit_exists(vehicle_id));
        }
        let visit = Visit::open(vehicle_id, check_in_at);
        table.open_by_vehicle.insert(vehicle_id, visit.id);
        table.by_id.insert(visit.id, visit.clone());
        Ok(visit)
    }

    async fn close_visit(
        &self,
        visit_id: VisitId,
        check_out_at: DateTime<Utc>,
        duration_minutes: i64,
        fee: Fee,
    ) -> Result<Visit, ParkingError> {
        let mut table = self.visits.write().await;
        let current = table
            .by_id
            .get(&visit_id)
            .ok_or(ParkingError::VisitNotFound(visit_id))?;
        let closed = current
            .closed(check_out_at, duration_minutes, fee)
            .ok_or(ParkingError::AlreadyClosed(visit_id))?;

        table.open_by_vehicle.remove(&closed.vehicle_id);
        table.by_id.insert(visit_id, closed.clone());
        Ok(closed)
    }

    async fn list_visits(&self) -> Result<Vec<Visit>, ParkingError> {
        let table = self.visits.read().await;
        Ok(newest_first(table.by_id.values().cloned().collect()))
    }

    async fn list_visits_by_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<Vec<Visit>, ParkingError> {
        let table = self.visits.read().await;
        Ok(newest_first(
            table
                .by_id
                .values()
                .filter(|visit| visit.vehicle_id == vehicle_id)
                .cloned()
                .collect(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_vehicle(plate: &str) -> Vehicle {
        Vehicle::new(
            plate.to_string(),
            "Jane Doe".to_string(),
            VehicleToken::generate(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_and_find_by_every_key() {
        let store = MemoryStore::new();
        let vehicle = make_vehicle("ABC-1234");
        let Ok(()) = store.insert_vehicle(&vehicle).await else {
            panic!("insert failed");
        };

        let Ok(Some(by_token)) = store.find_by_token(&vehicle.token).await else {
            panic!("lookup by token failed");
        };
        let Ok(Some(by_plate)) = store.find_by_plate("ABC-1234").await else {
            panic!("lookup by plate failed");
        };
        assert_eq!(by_token, vehicle);
        assert_eq!(by_plate, vehicle);
    }

    #[tokio::test]
    async fn rejects_duplicate_plate_and_token() {
        let store = MemoryStore::new();
        let first = make_vehicle("ABC-1234");
        let _ = store.insert_vehicle(&first).await;

        let same_plate = make_vehicle("ABC-1234");
        assert!(matches!(
            store.insert_vehicle(&same_plate).await,
            Err(ParkingError::DuplicatePlate(_))
        ));

        let mut same_token = make_vehicle("XYZ-9999");
        same_token.token = first.token.clone();
        assert!(matches!(
            store.insert_vehicle(&same_token).await,
            Err(ParkingError::DuplicateToken)
        ));

        assert_eq!(store.vehicle_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_token_is_absent() {
        let store = MemoryStore::new();
        let found = store.find_by_token(&VehicleToken::new("CAR-nope")).await;
        assert!(matches!(found, Ok(None)));
    }

    #[tokio::test]
    async fn second_open_visit_is_rejected() {
        let store = MemoryStore::new();
        let vehicle_id = VehicleId::new();
        let Ok(_) = store.create_visit(vehicle_id, Utc::now()).await else {
            panic!("first create failed");
        };
        let second = store.create_visit(vehicle_id, Utc::now()).await;
        assert!(matches!(second, Err(ParkingError::Storage(_))));
        assert_eq!(store.visit_count().await, 1);
    }

    #[tokio::test]
    async fn close_clears_open_index() {
        let store = MemoryStore::new();
        let vehicle_id = VehicleId::new();
        let t0 = Utc::now();
        let Ok(visit) = store.create_visit(vehicle_id, t0).await else {
            panic!("create failed");
        };

        let Ok(closed) = store
            .close_visit(visit.id, t0 + Duration::minutes(3), 3, 20)
            .await
        else {
            panic!("close failed");
        };
        assert!(!closed.is_open);
        assert!(matches!(store.find_open_by_vehicle(vehicle_id).await, Ok(None)));
        assert_eq!(store.open_visit_count().await, 0);

        // A fresh visit may be opened once the previous one is closed.
        assert!(store.create_visit(vehicle_id, Utc::now()).await.is_ok());
    }

    #[tokio::test]
    async fn close_reports_missing_and_closed_visits() {
        let store = MemoryStore::new();
        let missing = store.close_visit(VisitId::new(), Utc::now(), 0, 20).await;
        assert!(matches!(missing, Err(ParkingError::VisitNotFound(_))));

        let Ok(visit) = store.create_visit(VehicleId::new(), Utc::now()).await else {
            panic!("create failed");
        };
        let _ = store.close_visit(visit.id, Utc::now(), 0, 20).await;
        let again = store.close_visit(visit.id, Utc::now(), 0, 20).await;
        assert!(matches!(again, Err(ParkingError::AlreadyClosed(_))));
    }

    #[tokio::test]
    async fn lists_newest_check_in_first() {
        let store = MemoryStore::new();
        let t0 = Utc::now();
        let a = VehicleId::new();
        let b = VehicleId::new();
        let _ = store.create_visit(a, t0).await;
        let _ = store.create_visit(b, t0 + Duration::minutes(1)).await;

        let Ok(all) = store.list_visits().await else {
            panic!("list failed");
        };
        let order: Vec<VehicleId> = all.iter().map(|v| v.vehicle_id).collect();
        assert_eq!(order, vec![b, a]);

        let Ok(only_a) = store.list_visits_by_vehicle(a).await else {
            panic!("list by vehicle failed");
        };
        assert_eq!(only_a.len(), 1);
    }
}
