//! Plain data types. The [`ActorEntity`](crate::framework::ActorEntity) impls live in the
//! matching `*_actor` modules.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod user;

pub use cart::*;
pub use catalog::*;
pub use order::*;
pub use user::*;
