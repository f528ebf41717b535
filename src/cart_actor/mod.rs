//! # Cart Actor
//!
//! Holds every cart line of every user, keyed by (user, restaurant, product).
//!
//! - [`entity`] - [`ActorEntity`](crate::framework::ActorEntity) implementation for
//!   [`CartLine`] with merge-on-add
//! - [`error`] - [`CartError`]
//! - [`new()`] - Factory returning the actor and a [`CartStore`]

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::CartStore;
use crate::framework::ResourceActor;
use crate::model::CartLine;

/// Creates a new cart actor and its store client.
pub fn new(buffer_size: usize) -> (ResourceActor<CartLine>, CartStore) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, CartLine::key);
    (actor, CartStore::new(generic_client))
}
