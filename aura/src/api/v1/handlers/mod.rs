pub mod describe;
pub(crate) mod health;
pub mod history;
pub mod location;

pub use health::health_check;
