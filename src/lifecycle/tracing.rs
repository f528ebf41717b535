//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global `tracing` subscriber once per process. The level
//! comes from `RUST_LOG`; the compact formatter prints spans inline and hides module paths,
//! since store actors already tag their events with `entity_type`.
//!
//! ```bash
//! RUST_LOG=info cargo run                          # placement milestones only
//! RUST_LOG=debug cargo run                         # every store request with its payload
//! RUST_LOG=order_cart::orchestrator=debug cargo run
//! ```
//!
//! A successful placement at `info` reads roughly:
//!
//! ```text
//! INFO place_order{user_id="user_1" restaurant_id="rest_1"}: Action ok entity_type="Product" id="product_1"
//! INFO place_order{user_id="user_1" restaurant_id="rest_1"}: Created entity_type="Order" id="order_5c1f..."
//! INFO place_order{user_id="user_1" restaurant_id="rest_1"}: Order placed order_id="order_5c1f..." total=20.0
//! ```
//!
//! A rolled-back placement adds one `Placement failed` warning followed by a
//! `Stock restored` event per reservation, or `Compensation failed, queued for retry` when
//! the increment itself fails.

/// Installs the global subscriber. Calling it twice in one process is a no-op.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
