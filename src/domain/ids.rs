//! Type-safe vehicle and visit identifiers.
//!
//! [`VehicleId`] and [`VisitId`] are newtype wrappers around [`uuid::Uuid`]
//! (v4) so that a visit id can never be passed where a vehicle id is
//! expected, and vice versa.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a registered vehicle.
///
/// Assigned once at registration and immutable thereafter. Visits hold it
/// as a non-owning back-reference, and the lifecycle engine keys its
/// per-vehicle locks on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(uuid::Uuid);

impl VehicleId {
    /// Creates a new random `VehicleId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `VehicleId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for VehicleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for VehicleId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<VehicleId> for uuid::Uuid {
    fn from(id: VehicleId) -> Self {
        id.0
    }
}

/// Unique identifier of a single visit (one check-in/check-out session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitId(uuid::Uuid);

impl VisitId {
    /// Creates a new random `VisitId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `VisitId` from an existing [`uuid::Uuid`].
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner [`uuid::Uuid`].
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for VisitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VisitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<uuid::Uuid> for VisitId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl From<VisitId> for uuid::Uuid {
    fn from(id: VisitId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        assert_ne!(VehicleId::new(), VehicleId::new());
        assert_ne!(VisitId::new(), VisitId::new());
    }

    #[test]
    fn display_is_uuid_format() {
        let s = VehicleId::new().to_string();
        assert_eq!(s.len(), 36);
        assert!(s.contains('-'));
    }

    #[test]
    fn serializes_as_bare_uuid() {
        let uuid = uuid::Uuid::new_v4();
        let id = VisitId::from_uuid(uuid);
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, format!("\"{uuid}\""));
    }

    #[test]
    fn uuid_conversions_agree() {
        let uuid = uuid::Uuid::new_v4();
        let id = VehicleId::from(uuid);
        assert_eq!(*id.as_uuid(), uuid);
        assert_eq!(uuid::Uuid::from(id), uuid);
    }
}
