//! User actor: users and their saved delivery addresses.
//!
//! Backs the in-process [`AddressBook`](crate::remote::AddressBook) validator.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::UserClient;
use crate::framework::ResourceActor;
use crate::model::{User, UserCreate};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Creates a new User actor and its client. Ids are handed out as `user_N`.
pub fn new(buffer_size: usize) -> (ResourceActor<User>, UserClient) {
    let user_id_counter = Arc::new(AtomicU64::new(1));
    let next_user_id = move |_: &UserCreate| {
        let id = user_id_counter.fetch_add(1, Ordering::SeqCst);
        format!("user_{}", id)
    };

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_user_id);
    (actor, UserClient::new(generic_client))
}
