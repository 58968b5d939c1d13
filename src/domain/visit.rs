//! Occupancy sessions and their open/closed lifecycle.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Fee, VehicleId, VisitId};

/// One occupancy interval of a vehicle, from check-in to check-out.
///
/// A visit is created open and transitions exactly once to closed, at
/// which point `check_out_at`, `duration_minutes` and `fee` are all set.
/// Closed visits are immutable and never reopened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    /// Unique visit identifier.
    pub id: VisitId,
    /// Owning vehicle (back-reference only).
    pub vehicle_id: VehicleId,
    /// Check-in timestamp.
    pub check_in_at: DateTime<Utc>,
    /// Check-out timestamp, set at close.
    pub check_out_at: Option<DateTime<Utc>>,
    /// Whole minutes parked, set at close.
    pub duration_minutes: Option<i64>,
    /// Fee charged, set at close.
    pub fee: Option<Fee>,
    /// `true` from creation until close.
    pub is_open: bool,
}

impl Visit {
    /// Creates a new open visit for `vehicle_id` checked in at `check_in_at`.
    #[must_use]
    pub fn open(vehicle_id: VehicleId, check_in_at: DateTime<Utc>) -> Self {
        Self {
            id: VisitId::new(),
            vehicle_id,
            check_in_at,
            check_out_at: None,
            duration_minutes: None,
            fee: None,
            is_open: true,
        }
    }

    /// Returns a copy of this visit in the closed state.
    ///
    /// Returns `None` if the visit is already closed.
    #[must_use]
    pub fn closed(
        &self,
        check_out_at: DateTime<Utc>,
        duration_minutes: i64,
        fee: Fee,
    ) -> Option<Self> {
        if !self.is_open {
            return None;
        }
        Some(Self {
            check_out_at: Some(check_out_at),
            duration_minutes: Some(duration_minutes),
            fee: Some(fee),
            is_open: false,
            ..self.clone()
        })
    }
}

/// Whole minutes elapsed between `check_in_at` and `check_out_at`,
/// rounded down. A check-out that precedes the check-in (clock moved
/// backwards) counts as zero minutes.
#[must_use]
pub fn elapsed_minutes(check_in_at: DateTime<Utc>, check_out_at: DateTime<Utc>) -> i64 {
    let seconds = (check_out_at - check_in_at).num_seconds().max(0);
    seconds / 60
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn open_visit_has_no_close_fields() {
        let visit = Visit::open(VehicleId::new(), Utc::now());
        assert!(visit.is_open);
        assert!(visit.check_out_at.is_none());
        assert!(visit.duration_minutes.is_none());
        assert!(visit.fee.is_none());
    }

    #[test]
    fn closing_sets_every_close_field_once() {
        let t0 = Utc::now();
        let visit = Visit::open(VehicleId::new(), t0);
        let Some(closed) = visit.closed(t0 + Duration::minutes(5), 5, 20) else {
            panic!("open visit must close");
        };
        assert!(!closed.is_open);
        assert_eq!(closed.id, visit.id);
        assert_eq!(closed.check_in_at, t0);
        assert_eq!(closed.duration_minutes, Some(5));
        assert_eq!(closed.fee, Some(20));

        assert!(closed.closed(t0 + Duration::minutes(9), 9, 20).is_none());
    }

    #[test]
    fn elapsed_minutes_rounds_down() {
        let t0 = Utc::now();
        assert_eq!(elapsed_minutes(t0, t0), 0);
        assert_eq!(elapsed_minutes(t0, t0 + Duration::seconds(59)), 0);
        assert_eq!(elapsed_minutes(t0, t0 + Duration::seconds(90)), 1);
        assert_eq!(elapsed_minutes(t0, t0 + Duration::seconds(3_599)), 59);
        assert_eq!(elapsed_minutes(t0, t0 + Duration::hours(2)), 120);
    }

    #[test]
    fn elapsed_minutes_clamps_backwards_clock() {
        let t0 = Utc::now();
        assert_eq!(elapsed_minutes(t0, t0 - Duration::minutes(3)), 0);
    }
}
