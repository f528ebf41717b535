//! Error taxonomy of the orchestrator.

use crate::cart_actor::CartError;
use crate::model::OrderStatus;
use crate::order_actor::OrderError;
use crate::remote::RemoteError;
use thiserror::Error;

/// A store failed underneath an orchestration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreFailure {
    #[error("cart store: {0}")]
    Cart(#[from] CartError),
    #[error("order store: {0}")]
    Order(#[from] OrderError),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrchestratorError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    /// The order's current status does not allow the operation.
    #[error("{message}")]
    InvalidState { message: String, status: OrderStatus },

    #[error("cart is empty for restaurant {restaurant_id}")]
    EmptyCart { restaurant_id: String },

    /// The restaurant is banned; carries the ban reason.
    #[error("Restaurant is currently unavailable. Reason: {0}")]
    BusinessRuleViolation(String),

    #[error("insufficient stock for product {product_name}: available {available}, required {required}")]
    InsufficientStock {
        product_name: String,
        available: u32,
        required: u32,
    },

    #[error("product {0} not found")]
    ProductNotFound(String),

    #[error("invalid delivery address: {0}")]
    InvalidAddress(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{operation} failed: {source}")]
    Upstream {
        operation: &'static str,
        #[source]
        source: RemoteError,
    },

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreFailure),
}

impl OrchestratorError {
    /// True for failures caused by the request or the current state of the data, as
    /// opposed to infrastructure (remote services, stores).
    pub fn is_business_failure(&self) -> bool {
        !matches!(
            self,
            OrchestratorError::Upstream { .. } | OrchestratorError::Persistence(_)
        )
    }

    pub(crate) fn upstream(operation: &'static str) -> impl FnOnce(RemoteError) -> Self {
        move |source| OrchestratorError::Upstream { operation, source }
    }
}

impl From<CartError> for OrchestratorError {
    fn from(e: CartError) -> Self {
        match e {
            CartError::InvalidQuantity(q) => {
                OrchestratorError::InvalidRequest(format!("invalid quantity: {q}"))
            }
            other => OrchestratorError::Persistence(StoreFailure::Cart(other)),
        }
    }
}

impl From<OrderError> for OrchestratorError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(id) => OrchestratorError::NotFound(format!("order {id} not found")),
            other => OrchestratorError::Persistence(StoreFailure::Order(other)),
        }
    }
}
