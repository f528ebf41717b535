//! Error types for the Product actor.

use thiserror::Error;

/// Errors that can occur during product operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    /// The requested product was not found.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The requested quantity exceeds the available stock.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },

    /// A stock movement named a restaurant that does not own the product.
    #[error("Product {product_id} does not belong to restaurant {restaurant_id}")]
    WrongRestaurant {
        product_id: String,
        restaurant_id: String,
    },

    /// The reservation was given back before its decrement arrived.
    #[error("Reservation {0} was already released")]
    ReservationReleased(String),

    /// The provided quantity is invalid (e.g., zero).
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for ProductError {
    fn from(msg: String) -> Self {
        ProductError::ActorCommunicationError(msg)
    }
}
