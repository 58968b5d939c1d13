//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::{ParkingConfig, StorageBackend};
use crate::domain::{Clock, FlatFee, SystemClock};
use crate::persistence::{VehicleRepository, VisitRepository};
use crate::service::{VehicleRegistry, VisitLifecycleEngine, VisitLog};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Vehicle registration and token resolution.
    pub registry: VehicleRegistry,
    /// Scan processing.
    pub engine: Arc<VisitLifecycleEngine>,
    /// Read-only visit history.
    pub visit_log: VisitLog,
    /// Currency label attached to fees.
    pub fee_currency: String,
    /// Backend the stores run on, reported by `/health`.
    pub storage_backend: StorageBackend,
}

impl AppState {
    /// Wires the service layer over the given stores using wall-clock time.
    #[must_use]
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        visits: Arc<dyn VisitRepository>,
        config: &ParkingConfig,
    ) -> Self {
        Self::with_clock(vehicles, visits, config, Arc::new(SystemClock))
    }

    /// Wires the service layer over the given stores and clock.
    #[must_use]
    pub fn with_clock(
        vehicles: Arc<dyn VehicleRepository>,
        visits: Arc<dyn VisitRepository>,
        config: &ParkingConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let registry = VehicleRegistry::new(Arc::clone(&vehicles), Arc::clone(&clock));
        let engine = VisitLifecycleEngine::new(
            registry.clone(),
            Arc::clone(&visits),
            Arc::new(FlatFee::new(config.flat_fee)),
            clock,
        );
        Self {
            registry,
            engine: Arc::new(engine),
            visit_log: VisitLog::new(vehicles, visits),
            fee_currency: config.fee_currency.clone(),
            storage_backend: config.storage_backend,
        }
    }
}
