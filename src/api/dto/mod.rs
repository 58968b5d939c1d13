//! Data Transfer Objects for REST request/response serialization.
//!
//! Every request body is a typed struct; nothing reaches the service
//! layer as untyped JSON.

pub mod common_dto;
pub mod scan_dto;
pub mod vehicle_dto;
pub mod visit_dto;

pub use common_dto::*;
pub use scan_dto::*;
pub use vehicle_dto::*;
pub use visit_dto::*;
