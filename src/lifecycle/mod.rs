//! Configuration, tracing setup and the [`OrderSystem`] that starts and stops everything.

pub mod config;
pub mod order_system;
pub mod tracing;

pub use config::Config;
pub use order_system::OrderSystem;
pub use self::tracing::setup_tracing;
