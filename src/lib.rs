//! # Order Cart
//!
//! > **Carts and orders for a food-delivery platform, on resource-oriented actors.**
//!
//! A user fills one cart per restaurant, then turns a cart into an order. Placing an order
//! reserves stock in an inventory service, validates the delivery address with a user
//! service, persists the order and empties the cart. If any step after the first stock
//! reservation fails, every reservation is given back.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic `ResourceActor<T>` that owns a keyed collection in its own Tokio task and
//! serves Create/Get/List/Update/Delete/DeleteWhere/Action requests sequentially.
//! - **Key items**: [`ActorEntity`](framework::ActorEntity), [`ResourceActor`](framework::ResourceActor),
//!   [`MockClient`](framework::MockClient).
//!
//! ### 2. The Stores ([`cart_actor`], [`order_actor`]) and their clients ([`clients`])
//! Cart lines keyed by (user, restaurant, product), and orders keyed by order id.
//! - **Key items**: [`CartStore`](clients::CartStore), [`OrderStore`](clients::OrderStore).
//!
//! ### 3. The Remote Services ([`remote`])
//! What the service consumes from outside, as injectable traits, plus in-process
//! stand-ins built on [`product_actor`], [`restaurant_actor`] and [`user_actor`].
//! - **Key items**: [`InventoryClient`](remote::InventoryClient), [`AddressValidator`](remote::AddressValidator).
//!
//! ### 4. The Orchestrator ([`orchestrator`])
//! The placement saga with compensation, the order status rules and every cart mutation,
//! each under a per-cart lock.
//! - **Key items**: [`OrderOrchestrator`](orchestrator::OrderOrchestrator),
//!   [`CompensationOutbox`](orchestrator::CompensationOutbox).
//!
//! ### 5. The Surface ([`service`])
//! Request/response DTOs and the mapping of orchestrator outcomes onto them.
//!
//! ### 6. The Runtime ([`lifecycle`])
//! Configuration from the environment, tracing setup, and
//! [`OrderSystem`](lifecycle::OrderSystem), which spawns and wires every actor and shuts
//! them down again.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod cart_actor;
pub mod clients;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod orchestrator;
pub mod order_actor;
pub mod product_actor;
pub mod remote;
pub mod restaurant_actor;
pub mod service;
pub mod user_actor;
