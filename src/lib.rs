//! # parking-gateway
//!
//! REST gateway for a parking lot: vehicles are registered once and receive
//! an opaque token (printed as a QR sticker); every scan of that token
//! alternately checks the vehicle in and out, and a completed visit carries
//! its duration and fee.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── VisitLifecycleEngine (service/)
//!     ├── VehicleRegistry / VisitLog (service/)
//!     │
//!     ├── FeePolicy, Clock, TokenSource (domain/)
//!     │
//!     └── Storage: MemoryStore | PostgresStore (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
