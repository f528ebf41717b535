//! Type-safe wrappers around [`ResourceClient`](crate::framework::ResourceClient).
//!
//! [`CartStore`] and [`OrderStore`] are the persistence layer of the service. The product,
//! restaurant and user clients back the in-process stand-ins in [`crate::remote`].

pub mod actor_client;
pub mod cart_store;
pub mod order_store;
pub mod product_client;
pub mod restaurant_client;
pub mod user_client;

pub use actor_client::*;
pub use cart_store::*;
pub use order_store::*;
pub use product_client::*;
pub use restaurant_client::*;
pub use user_client::*;
