//! HTTP client for the external order-management service.
//!
//! Ships payloads built by the domain crates and deserializes the service's
//! canonical responses. No business rules live here; validation happens
//! before a payload reaches this crate, and the server stays the final
//! arbiter.

pub mod api;
pub mod error;

pub use api::{OrderFilter, OrderServiceClient};
pub use error::ClientError;
