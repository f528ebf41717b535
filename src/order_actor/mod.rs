//! Order store actor: orders with their item snapshots, keyed by order id.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::OrderStore;
use crate::framework::ResourceActor;
use crate::model::Order;

/// Creates a new order actor and its store client.
///
/// Ids are minted by [`Order::new`], so the actor reads the key back from the payload.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderStore) {
    let (actor, generic_client) =
        ResourceActor::new(buffer_size, |order: &Order| order.order_id.clone());
    (actor, OrderStore::new(generic_client))
}
