//! # Product Actor
//!
//! The catalog side of the in-process inventory: products, their prices and stock.
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for [`Product`]
//! - [`error`] - [`ProductError`]
//! - [`actions`] - [`ProductAction`] and [`ProductActionResult`] for stock movements
//!
//! ```rust,ignore
//! let remaining = product_client
//!     .decrement_stock(&product_id, &restaurant_id, 2, "resv_1")
//!     .await?;
//! product_client
//!     .increment_stock(&product_id, &restaurant_id, 2, "resv_1")
//!     .await?;
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::ProductClient;
use crate::framework::ResourceActor;
use crate::model::{Product, ProductCreate};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Creates a new Product actor and its client. Ids are handed out as `product_N`.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, ProductClient) {
    let product_id_counter = Arc::new(AtomicU64::new(1));
    let next_product_id = move |_: &ProductCreate| {
        let id = product_id_counter.fetch_add(1, Ordering::SeqCst);
        format!("product_{}", id)
    };

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_product_id);
    (actor, ProductClient::new(generic_client))
}
