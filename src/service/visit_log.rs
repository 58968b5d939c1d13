//! Visit log: the read-only reporting view over all visits.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Vehicle, VehicleId, Visit};
use crate::error::ParkingError;
use crate::persistence::{VehicleRepository, VisitRepository};

/// Placeholder shown for a visit whose vehicle cannot be found.
const MISSING: &str = "-";

/// Whether a logged visit is still in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VisitStatus {
    /// The vehicle is still on the lot.
    CheckedIn,
    /// The vehicle has left.
    CheckedOut,
}

impl From<&Visit> for VisitStatus {
    fn from(visit: &Visit) -> Self {
        if visit.is_open {
            Self::CheckedIn
        } else {
            Self::CheckedOut
        }
    }
}

/// One visit joined with the plate and owner of its vehicle.
#[derive(Debug, Clone, Serialize)]
pub struct VisitLogEntry {
    /// The visit itself.
    pub visit: Visit,
    /// Plate of the visiting vehicle.
    pub plate_number: String,
    /// Owner of the visiting vehicle.
    pub owner_name: String,
    /// Derived in-progress / finished status.
    pub status: VisitStatus,
}

/// Builds the visit log consumed by listing and export collaborators.
#[derive(Debug, Clone)]
pub struct VisitLog {
    vehicles: Arc<dyn VehicleRepository>,
    visits: Arc<dyn VisitRepository>,
}

impl VisitLog {
    /// Creates a visit log over the given stores.
    #[must_use]
    pub fn new(vehicles: Arc<dyn VehicleRepository>, visits: Arc<dyn VisitRepository>) -> Self {
        Self { vehicles, visits }
    }

    /// Returns every visit, newest check-in first, joined with its vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::Storage`] on adapter failure.
    pub async fn entries(&self) -> Result<Vec<VisitLogEntry>, ParkingError> {
        let visits = self.visits.list_visits().await?;
        let vehicles: HashMap<VehicleId, Vehicle> = self
            .vehicles
            .list_vehicles()
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();
        Ok(join(visits, &vehicles))
    }
}

fn join(visits: Vec<Visit>, vehicles: &HashMap<VehicleId, Vehicle>) -> Vec<VisitLogEntry> {
    visits
        .into_iter()
        .map(|visit| {
            let (plate_number, owner_name) = match vehicles.get(&visit.vehicle_id) {
                Some(v) => (v.plate_number.clone(), v.owner_name.clone()),
                None => {
                    tracing::warn!(vehicle_id = %visit.vehicle_id, "visit references unknown vehicle");
                    (MISSING.to_string(), MISSING.to_string())
                }
            };
            VisitLogEntry {
                status: VisitStatus::from(&visit),
                visit,
                plate_number,
                owner_name,
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::domain::VehicleToken;
    use crate::persistence::MemoryStore;

    #[tokio::test]
    async fn entries_join_vehicle_details_newest_first() {
        let store = Arc::new(MemoryStore::new());
        let vehicle = Vehicle::new(
            "ABC-1234".to_string(),
            "Jane Doe".to_string(),
            VehicleToken::generate(),
            Utc::now(),
        );
        let _ = store.insert_vehicle(&vehicle).await;

        let t0 = Utc::now();
        let Ok(first) = store.create_visit(vehicle.id, t0).await else {
            panic!("create failed");
        };
        let _ = store
            .close_visit(first.id, t0 + Duration::minutes(5), 5, 20)
            .await;
        let _ = store
            .create_visit(vehicle.id, t0 + Duration::minutes(10))
            .await;

        let log = VisitLog::new(
            Arc::clone(&store) as Arc<dyn VehicleRepository>,
            Arc::clone(&store) as Arc<dyn VisitRepository>,
        );
        let Ok(entries) = log.entries().await else {
            panic!("log failed");
        };

        let statuses: Vec<VisitStatus> = entries.iter().map(|e| e.status).collect();
        assert_eq!(statuses, vec![VisitStatus::CheckedIn, VisitStatus::CheckedOut]);
        assert!(entries.iter().all(|e| e.plate_number == "ABC-1234"));
        assert!(entries.iter().all(|e| e.owner_name == "Jane Doe"));
    }

    #[test]
    fn orphan_visit_gets_placeholder() {
        let visit = Visit::open(VehicleId::new(), Utc::now());
        let entries = join(vec![visit], &HashMap::new());
        let Some(entry) = entries.first() else {
            panic!("expected one entry");
        };
        assert_eq!(entry.plate_number, MISSING);
        assert_eq!(entry.status, VisitStatus::CheckedIn);
    }
}
