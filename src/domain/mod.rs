//! Domain layer: vehicles, visits, tokens, and the policies around them.
//!
//! This module holds the plain data model shared by every other layer:
//! typed identifiers, the vehicle and visit records, the scan outcome,
//! and the injectable fee policy and clock.

pub mod clock;
pub mod fee;
pub mod ids;
pub mod scan;
pub mod token;
pub mod vehicle;
pub mod visit;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fee::{Fee, FeePolicy, FlatFee, compute_fee};
pub use ids::{VehicleId, VisitId};
pub use scan::ScanResult;
pub use token::{RandomTokenSource, TokenSource, VehicleToken};
pub use vehicle::Vehicle;
pub use visit::{Visit, elapsed_minutes};
