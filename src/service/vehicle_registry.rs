//! Vehicle registry: issues and resolves vehicle identities.

use std::sync::Arc;

use crate::domain::{Clock, RandomTokenSource, TokenSource, Vehicle, VehicleToken};
use crate::error::ParkingError;
use crate::persistence::VehicleRepository;

/// How many fresh tokens `register` tries before giving up on collisions.
pub const MAX_TOKEN_ATTEMPTS: usize = 8;

/// Registers vehicles and resolves scanned tokens back to them.
///
/// Vehicles are immutable once registered: there is no update or delete,
/// and re-registering a plate is rejected rather than merged.
#[derive(Debug, Clone)]
pub struct VehicleRegistry {
    vehicles: Arc<dyn VehicleRepository>,
    tokens: Arc<dyn TokenSource>,
    clock: Arc<dyn Clock>,
}

impl VehicleRegistry {
    /// Creates a registry issuing random 128-bit tokens.
    #[must_use]
    pub fn new(vehicles: Arc<dyn VehicleRepository>, clock: Arc<dyn Clock>) -> Self {
        Self::with_token_source(vehicles, Arc::new(RandomTokenSource), clock)
    }

    /// Creates a registry drawing tokens from `tokens`.
    #[must_use]
    pub fn with_token_source(
        vehicles: Arc<dyn VehicleRepository>,
        tokens: Arc<dyn TokenSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            vehicles,
            tokens,
            clock,
        }
    }

    /// Registers a vehicle and issues its token.
    ///
    /// Plate and owner are trimmed before storing. A token collision is
    /// retried with a fresh token up to [`MAX_TOKEN_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// - [`ParkingError::InvalidRequest`] if plate or owner is blank.
    /// - [`ParkingError::DuplicatePlate`] if the plate is already registered.
    /// - [`ParkingError::DuplicateToken`] if every attempt collided.
    /// - [`ParkingError::Storage`] on adapter failure.
    pub async fn register(
        &self,
        plate_number: &str,
        owner_name: &str,
    ) -> Result<Vehicle, ParkingError> {
        let plate_number = required("plate_number", plate_number)?;
        let owner_name = required("owner_name", owner_name)?;

        // Fast path; the store's unique plate constraint still decides races.
        if self.vehicles.find_by_plate(&plate_number).await?.is_some() {
            return Err(ParkingError::DuplicatePlate(plate_number));
        }

        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let vehicle = Vehicle::new(
                plate_number.clone(),
                owner_name.clone(),
                self.tokens.next_token(),
                self.clock.now(),
            );
            match self.vehicles.insert_vehicle(&vehicle).await {
                Ok(()) => {
                    tracing::info!(
                        vehicle_id = %vehicle.id,
                        plate = %vehicle.plate_number,
                        "vehicle registered"
                    );
                    return Ok(vehicle);
                }
                Err(ParkingError::DuplicateToken) => {
                    tracing::warn!(attempt, plate = %plate_number, "token collision, reissuing");
                }
                Err(err) => return Err(err),
            }
        }

        Err(ParkingError::DuplicateToken)
    }

    /// Resolves a scanned token to its vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::VehicleNotFound`] if no vehicle holds the
    /// token, or [`ParkingError::Storage`] on adapter failure.
    pub async fn resolve_by_token(&self, token: &VehicleToken) -> Result<Vehicle, ParkingError> {
        self.vehicles
            .find_by_token(token)
            .await?
            .ok_or_else(|| ParkingError::VehicleNotFound(token.to_string()))
    }

    /// Looks up a vehicle by plate.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::Storage`] on adapter failure.
    pub async fn find_by_plate(&self, plate_number: &str) -> Result<Option<Vehicle>, ParkingError> {
        self.vehicles.find_by_plate(plate_number.trim()).await
    }

    /// Returns every registered vehicle, oldest registration first.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::Storage`] on adapter failure.
    pub async fn list(&self) -> Result<Vec<Vehicle>, ParkingError> {
        self.vehicles.list_vehicles().await
    }
}

fn required(field: &str, value: &str) -> Result<String, ParkingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ParkingError::InvalidRequest(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::domain::SystemClock;
    use crate::persistence::MemoryStore;

    /// Replays a fixed list of tokens, then falls back to random ones.
    #[derive(Debug)]
    struct ScriptedTokens(Mutex<Vec<VehicleToken>>);

    impl TokenSource for ScriptedTokens {
        fn next_token(&self) -> VehicleToken {
            let mut queue = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            if queue.is_empty() {
                VehicleToken::generate()
            } else {
                queue.remove(0)
            }
        }
    }

    fn make_registry() -> (VehicleRegistry, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let registry = VehicleRegistry::new(
            Arc::clone(&store) as Arc<dyn VehicleRepository>,
            Arc::new(SystemClock),
        );
        (registry, store)
    }

    #[tokio::test]
    async fn register_issues_unique_token() {
        let (registry, _) = make_registry();
        let Ok(a) = registry.register("ABC-1234", "Jane Doe").await else {
            panic!("registration failed");
        };
        let Ok(b) = registry.register("XYZ-9876", "John Roe").await else {
            panic!("registration failed");
        };
        assert!(!a.token.as_str().is_empty());
        assert_ne!(a.token, b.token);
    }

    #[tokio::test]
    async fn duplicate_plate_is_rejected_without_mutation() {
        let (registry, store) = make_registry();
        let _ = registry.register("ABC-1234", "Jane Doe").await;

        let again = registry.register("ABC-1234", "Someone Else").await;
        assert!(matches!(again, Err(ParkingError::DuplicatePlate(p)) if p == "ABC-1234"));
        assert_eq!(store.vehicle_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_plate_is_caught_before_issuing_a_token() {
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(ScriptedTokens(Mutex::new(vec![
            VehicleToken::new("CAR-first"),
            VehicleToken::new("CAR-second"),
        ])));
        let registry = VehicleRegistry::with_token_source(
            Arc::clone(&store) as Arc<dyn VehicleRepository>,
            Arc::clone(&tokens) as Arc<dyn TokenSource>,
            Arc::new(SystemClock),
        );

        let _ = registry.register("ABC-1234", "Jane Doe").await;
        let again = registry.register(" ABC-1234 ", "John Roe").await;
        assert!(matches!(again, Err(ParkingError::DuplicatePlate(p)) if p == "ABC-1234"));

        let remaining = tokens
            .0
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len();
        assert_eq!(remaining, 1);
    }

    #[tokio::test]
    async fn lookups_by_plate_and_listing() {
        let (registry, _) = make_registry();
        let Ok(first) = registry.register("AAA-0001", "Ann").await else {
            panic!("registration failed");
        };
        let Ok(second) = registry.register("BBB-0002", "Bob").await else {
            panic!("registration failed");
        };

        let Ok(Some(found)) = registry.find_by_plate("  BBB-0002").await else {
            panic!("plate lookup failed");
        };
        assert_eq!(found.id, second.id);
        assert!(matches!(registry.find_by_plate("ZZZ-9999").await, Ok(None)));

        let Ok(all) = registry.list().await else {
            panic!("list failed");
        };
        let ids: Vec<_> = all.iter().map(|v| v.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&first.id));
        assert!(ids.contains(&second.id));
    }

    #[tokio::test]
    async fn blank_fields_are_invalid() {
        let (registry, store) = make_registry();
        assert!(matches!(
            registry.register("   ", "Jane Doe").await,
            Err(ParkingError::InvalidRequest(_))
        ));
        assert!(matches!(
            registry.register("ABC-1234", "").await,
            Err(ParkingError::InvalidRequest(_))
        ));
        assert_eq!(store.vehicle_count().await, 0);
    }

    #[tokio::test]
    async fn token_collision_is_retried() {
        let store = Arc::new(MemoryStore::new());
        let taken = VehicleToken::new("CAR-taken");
        let tokens = Arc::new(ScriptedTokens(Mutex::new(vec![
            taken.clone(),
            taken.clone(),
            VehicleToken::new("CAR-fresh"),
        ])));
        let registry = VehicleRegistry::with_token_source(
            Arc::clone(&store) as Arc<dyn VehicleRepository>,
            tokens,
            Arc::new(SystemClock),
        );

        let Ok(first) = registry.register("AAA-0001", "Jane Doe").await else {
            panic!("first registration failed");
        };
        assert_eq!(first.token, taken);

        let Ok(second) = registry.register("BBB-0002", "John Roe").await else {
            panic!("second registration failed");
        };
        assert_eq!(second.token.as_str(), "CAR-fresh");
    }

    #[tokio::test]
    async fn persistent_collisions_surface_duplicate_token() {
        let store = Arc::new(MemoryStore::new());
        let taken = VehicleToken::new("CAR-taken");
        let script = vec![taken.clone(); MAX_TOKEN_ATTEMPTS + 1];
        let registry = VehicleRegistry::with_token_source(
            Arc::clone(&store) as Arc<dyn VehicleRepository>,
            Arc::new(ScriptedTokens(Mutex::new(script))),
            Arc::new(SystemClock),
        );

        let _ = registry.register("AAA-0001", "Jane Doe").await;
        let result = registry.register("BBB-0002", "John Roe").await;
        assert!(matches!(result, Err(ParkingError::DuplicateToken)));
        assert_eq!(store.vehicle_count().await, 1);
    }

    #[tokio::test]
    async fn resolve_is_idempotent() {
        let (registry, _) = make_registry();
        let Ok(vehicle) = registry.register("ABC-1234", "Jane Doe").await else {
            panic!("registration failed");
        };
        let Ok(first) = registry.resolve_by_token(&vehicle.token).await else {
            panic!("resolve failed");
        };
        let Ok(second) = registry.resolve_by_token(&vehicle.token).await else {
            panic!("resolve failed");
        };
        assert_eq!(first.id, second.id);
        assert_eq!(first.id, vehicle.id);
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let (registry, _) = make_registry();
        let result = registry
            .resolve_by_token(&VehicleToken::new("CAR-unknown"))
            .await;
        assert!(matches!(result, Err(ParkingError::VehicleNotFound(_))));
    }
}
