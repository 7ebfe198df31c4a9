//! Real-time fan-out of video frames and location fixes between connected
//! peers. Delivery is at-most-once and best-effort: freshness, not
//! completeness, is the contract.

pub mod events;
pub mod registry;
pub mod socket;

pub use events::{ClientEvent, FramePayload, Hello, LocationPayload, ServerEvent};
pub use registry::SessionRegistry;
