//! Registered vehicle record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{VehicleId, VehicleToken};

/// A vehicle known to the lot.
///
/// Created once by [`crate::service::VehicleRegistry::register`] and never
/// mutated or deleted afterwards. Both `plate_number` and `token` are
/// unique across all vehicles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    /// Unique vehicle identifier.
    pub id: VehicleId,
    /// Licence plate, unique across all vehicles.
    pub plate_number: String,
    /// Name of the registered owner.
    pub owner_name: String,
    /// Scannable identity token.
    pub token: VehicleToken,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
}

impl Vehicle {
    /// Creates a new vehicle record with a fresh [`VehicleId`].
    #[must_use]
    pub fn new(
        plate_number: String,
        owner_name: String,
        token: VehicleToken,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: VehicleId::new(),
            plate_number,
            owner_name,
            token,
            registered_at,
        }
    }
}
