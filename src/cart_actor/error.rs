//! Error types for the cart store.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// No line exists for the given (user, restaurant, product) key.
    #[error("Cart line not found: {0}")]
    NotFound(String),

    /// Lines must always hold at least one unit.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CartError {
    fn from(msg: String) -> Self {
        CartError::ActorCommunicationError(msg)
    }
}
