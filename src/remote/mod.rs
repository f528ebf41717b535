//! # Remote Services
//!
//! The two capabilities the orchestrator consumes from outside the service, expressed as
//! `Send + Sync` async traits so they can be injected as `Arc<dyn …>`:
//!
//! - [`InventoryClient`] - products, restaurants, ban status and stock movements
//! - [`AddressValidator`] - delivery address ownership and details
//!
//! [`CatalogInventory`] and [`AddressBook`] implement them on top of the product,
//! restaurant and user actors so the whole system runs in one process.

pub mod address;
pub mod error;
pub mod inventory;

pub use address::*;
pub use error::*;
pub use inventory::*;
