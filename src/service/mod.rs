//! Service layer: the registry, the lifecycle engine, and reporting.
//!
//! [`VehicleRegistry`] issues and resolves vehicle tokens,
//! [`VisitLifecycleEngine`] turns scans into check-ins and check-outs,
//! and [`VisitLog`] assembles the read-only visit history.

pub mod vehicle_locks;
pub mod vehicle_registry;
pub mod visit_engine;
pub mod visit_log;

pub use vehicle_locks::VehicleLocks;
pub use vehicle_registry::VehicleRegistry;
pub use visit_engine::VisitLifecycleEngine;
pub use visit_log::{VisitLog, VisitLogEntry, VisitStatus};
