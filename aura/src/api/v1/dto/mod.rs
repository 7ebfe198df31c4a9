//! v1 API Data Transfer Objects.
//!
//! These types define the wire format for the v1 REST API. They are separate
//! from the internal domain models in `src/models/` and handle serialization,
//! deserialization, and domain-model conversion. Field names are camelCase to
//! match what the companion mobile and guide apps already send.

pub mod describe;
pub mod history;
pub mod location;

pub use describe::*;
pub use history::*;
pub use location::*;
