//! Aura backend: real-time relay, location reconciliation, and assistive
//! scene description for paired user and guide devices.

pub mod api;
pub mod assist;
pub mod config;
pub mod db;
pub mod error;
pub mod location;
pub mod models;
pub mod relay;
pub mod vision;
