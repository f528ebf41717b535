//! Generic actor framework for in-process stores.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that stored types implement to be managed by an actor
//! - [`ResourceActor`] - Generic actor that owns a keyed collection of entities
//! - [`ResourceClient`] - Cloneable handle that talks to a `ResourceActor`
//! - [`Filter`] - Predicate used by `List` and `DeleteWhere`
//! - [`FrameworkError`] - Errors raised by the plumbing
//!
//! # Testing
//!
//! See [`mock`] for utilities to test clients without spawning full actors.

pub mod core;
pub mod mock;

pub use core::*;
pub use mock::MockClient;
