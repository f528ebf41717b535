//! Restaurant actor: names, phone numbers and ban status for the in-process inventory.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::RestaurantClient;
use crate::framework::ResourceActor;
use crate::model::{Restaurant, RestaurantCreate};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Creates a new Restaurant actor and its client. Ids are handed out as `rest_N`.
pub fn new(buffer_size: usize) -> (ResourceActor<Restaurant>, RestaurantClient) {
    let restaurant_id_counter = Arc::new(AtomicU64::new(1));
    let next_restaurant_id = move |_: &RestaurantCreate| {
        let id = restaurant_id_counter.fetch_add(1, Ordering::SeqCst);
        format!("rest_{}", id)
    };

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_restaurant_id);
    (actor, RestaurantClient::new(generic_client))
}
