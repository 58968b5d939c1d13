//! Per-vehicle mutual exclusion for scan processing.
//!
//! [`VehicleLocks`] hands out one [`tokio::sync::Mutex`] per vehicle so the
//! find-open-then-act sequence of a scan runs atomically per vehicle,
//! while scans of different vehicles never wait on each other.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::VehicleId;

/// Lock table keyed by [`VehicleId`].
///
/// The outer map is only held long enough to look up or insert an
/// entry; the per-vehicle mutex is what callers wait on.
#[derive(Debug, Default)]
pub struct VehicleLocks {
    locks: Mutex<HashMap<VehicleId, Arc<Mutex<()>>>>,
}

impl VehicleLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `vehicle_id`.
    ///
    /// The returned guard releases the vehicle when dropped.
    pub async fn acquire(&self, vehicle_id: VehicleId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.locks.lock().await;
            Arc::clone(map.entry(vehicle_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Returns the number of vehicles that have been locked at least once.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    /// Returns `true` if no vehicle has been locked yet.
    pub async fn is_empty(&self) -> bool {
        self.locks.lock().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn same_vehicle_waits_until_guard_is_dropped() {
        let locks = VehicleLocks::new();
        let id = VehicleId::new();
        let guard = tokio_test::block_on(locks.acquire(id));

        let mut second = tokio_test::task::spawn(locks.acquire(id));
        tokio_test::assert_pending!(second.poll());

        drop(guard);
        assert!(second.is_woken());
        let _second_guard = tokio_test::assert_ready!(second.poll());
    }

    #[test]
    fn different_vehicles_do_not_contend() {
        let locks = VehicleLocks::new();
        let _a = tokio_test::block_on(locks.acquire(VehicleId::new()));

        let mut b = tokio_test::task::spawn(locks.acquire(VehicleId::new()));
        let _b = tokio_test::assert_ready!(b.poll());
        assert_eq!(tokio_test::block_on(locks.len()), 2);
        assert!(!tokio_test::block_on(locks.is_empty()));
    }
}
