//! Error types for the Restaurant actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RestaurantError {
    #[error("Restaurant not found: {0}")]
    NotFound(String),

    #[error("Restaurant validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for RestaurantError {
    fn from(msg: String) -> Self {
        RestaurantError::ActorCommunicationError(msg)
    }
}
