//! Visit lifecycle engine: turns scans into check-ins and check-outs.

use std::sync::Arc;

use crate::domain::{
    Clock, FeePolicy, ScanResult, Vehicle, VehicleId, VehicleToken, Visit, elapsed_minutes,
};
use crate::error::ParkingError;
use crate::persistence::VisitRepository;

use super::{VehicleLocks, VehicleRegistry};

/// Interprets scans and enforces at most one open visit per vehicle.
///
/// Every scan follows the pattern: resolve vehicle → take the vehicle's
/// lock → read its open visit → create or close → release. The lock
/// makes the read-then-write atomic per vehicle; scans of different
/// vehicles proceed independently.
///
/// Per vehicle the only states are "no open visit" and "open visit", so
/// repeated scans strictly alternate check-in and check-out.
#[derive(Debug, Clone)]
pub struct VisitLifecycleEngine {
    registry: VehicleRegistry,
    visits: Arc<dyn VisitRepository>,
    fees: Arc<dyn FeePolicy>,
    clock: Arc<dyn Clock>,
    locks: Arc<VehicleLocks>,
}

impl VisitLifecycleEngine {
    /// Creates a new engine.
    #[must_use]
    pub fn new(
        registry: VehicleRegistry,
        visits: Arc<dyn VisitRepository>,
        fees: Arc<dyn FeePolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            visits,
            fees,
            clock,
            locks: Arc::new(VehicleLocks::new()),
        }
    }

    /// Returns the registry used to resolve tokens.
    #[must_use]
    pub fn registry(&self) -> &VehicleRegistry {
        &self.registry
    }

    /// Processes one scan of `token`.
    ///
    /// # Errors
    ///
    /// - [`ParkingError::VehicleNotFound`] if no vehicle holds the token;
    ///   no visit is touched.
    /// - [`ParkingError::Storage`] if the adapter fails; no partial visit
    ///   is left behind.
    /// - [`ParkingError::VisitNotFound`] / [`ParkingError::AlreadyClosed`]
    ///   if the store contradicts its own open-visit answer.
    pub async fn process_scan(&self, token: &VehicleToken) -> Result<ScanResult, ParkingError> {
        let vehicle = match self.registry.resolve_by_token(token).await {
            Ok(vehicle) => vehicle,
            Err(err) => {
                if matches!(err, ParkingError::VehicleNotFound(_)) {
                    tracing::warn!(%token, "scan rejected: unknown token");
                }
                return Err(err);
            }
        };
        self.process_vehicle(&vehicle).await
    }

    /// Processes a scan for an already resolved vehicle.
    ///
    /// # Errors
    ///
    /// Same as [`Self::process_scan`], minus token resolution.
    pub async fn process_vehicle(&self, vehicle: &Vehicle) -> Result<ScanResult, ParkingError> {
        let _guard = self.locks.acquire(vehicle.id).await;

        match self.visits.find_open_by_vehicle(vehicle.id).await? {
            None => self.check_in(vehicle.id).await,
            Some(open) => self.check_out(open).await,
        }
    }

    /// Returns the visits of the vehicle holding `token`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::VehicleNotFound`] for an unknown token, or
    /// [`ParkingError::Storage`] on adapter failure.
    pub async fn visits_for_token(
        &self,
        token: &VehicleToken,
    ) -> Result<(Vehicle, Vec<Visit>), ParkingError> {
        let vehicle = self.registry.resolve_by_token(token).await?;
        let visits = self.visits.list_visits_by_vehicle(vehicle.id).await?;
        Ok((vehicle, visits))
    }

    async fn check_in(&self, vehicle_id: VehicleId) -> Result<ScanResult, ParkingError> {
        let visit = self
            .visits
            .create_visit(vehicle_id, self.clock.now())
            .await?;
        tracing::info!(%vehicle_id, visit_id = %visit.id, "vehicle checked in");
        Ok(ScanResult::CheckedIn { visit })
    }

    async fn check_out(&self, open: Visit) -> Result<ScanResult, ParkingError> {
        let check_out_at = self.clock.now();
        let duration_minutes = elapsed_minutes(open.check_in_at, check_out_at);
        let fee = self.fees.compute_fee(duration_minutes);

        let visit = self
            .visits
            .close_visit(open.id, check_out_at, duration_minutes, fee)
            .await
            .inspect_err(|err| {
                if err.is_invariant_violation() {
                    tracing::error!(
                        vehicle_id = %open.vehicle_id,
                        visit_id = %open.id,
                        error = %err,
                        "open visit vanished during check-out"
                    );
                }
            })?;

        tracing::info!(
            vehicle_id = %visit.vehicle_id,
            visit_id = %visit.id,
            duration_minutes,
            fee,
            "vehicle checked out"
        );
        Ok(ScanResult::CheckedOut {
            visit,
            duration_minutes,
            fee,
        })
    }
}
