//! # Order/Cart Service
//!
//! The request/response surface of the service. Each method takes a DTO from [`dto`],
//! delegates to the [`OrderOrchestrator`] and shapes the answer.
//!
//! Failure reporting:
//! - Responses that carry a `success` flag report business failures (bad state, wrong
//!   owner, empty cart, ...) as `success: false` with a message.
//! - Message-only cart responses report business failures in `message`.
//! - Infrastructure failures (remote services, stores) are always returned as `Err`, as is
//!   every failure of a pure read.

pub mod dto;

pub use dto::*;

use crate::model::{cart_total, OrderStatus};
use crate::orchestrator::{OrchestratorError, OrderOrchestrator, PlaceOrder, QuantityChange};
use tokio::time::Instant;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct OrderCartService {
    orchestrator: OrderOrchestrator,
}

/// Turns a business failure into `Ok(fallback)`; infrastructure failures stay `Err`.
fn report_business<T>(
    result: Result<T, OrchestratorError>,
    fallback: impl FnOnce(OrchestratorError) -> T,
) -> Result<T, OrchestratorError> {
    match result {
        Err(e) if e.is_business_failure() => {
            info!(error = %e, "Request refused");
            Ok(fallback(e))
        }
        other => other,
    }
}

fn parse_status(raw: &str) -> Result<OrderStatus, OrchestratorError> {
    raw.trim()
        .to_ascii_uppercase()
        .parse()
        .map_err(|e: crate::model::UnknownStatus| OrchestratorError::InvalidRequest(e.to_string()))
}

impl OrderCartService {
    pub fn new(orchestrator: OrderOrchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &OrderOrchestrator {
        &self.orchestrator
    }

    // --- Cart ---

    #[instrument(skip(self))]
    pub async fn add_product_to_cart(
        &self,
        req: AddProductToCartRequest,
    ) -> Result<MessageResponse, OrchestratorError> {
        let result = self
            .orchestrator
            .add_product_to_cart(&req.user_id, &req.product_id, req.quantity)
            .await
            .map(|_| MessageResponse::new("Product added to cart successfully"));
        report_business(result, |e| match e {
            OrchestratorError::ProductNotFound(_) => MessageResponse::new("Product not found"),
            other => MessageResponse::new(other.to_string()),
        })
    }

    #[instrument(skip(self))]
    pub async fn get_cart_items(
        &self,
        req: CartRequest,
    ) -> Result<GetCartItemsResponse, OrchestratorError> {
        let lines = self
            .orchestrator
            .cart(&req.user_id, &req.restaurant_id)
            .await?;
        Ok(GetCartItemsResponse {
            items: lines.iter().map(CartItemView::from).collect(),
            total_amount: cart_total(&lines),
            message: "Cart items retrieved successfully".to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn get_all_carts(
        &self,
        req: UserRequest,
    ) -> Result<GetAllCartsResponse, OrchestratorError> {
        let carts = self.orchestrator.carts(&req.user_id).await?;
        Ok(GetAllCartsResponse {
            carts: carts
                .into_iter()
                .map(|(restaurant_id, lines)| RestaurantCartView::new(restaurant_id, &lines))
                .collect(),
        })
    }

    #[instrument(skip(self))]
    pub async fn increment_product_quantity(
        &self,
        req: CartProductRequest,
    ) -> Result<MessageResponse, OrchestratorError> {
        let result = self
            .orchestrator
            .increment_quantity(&req.user_id, &req.restaurant_id, &req.product_id)
            .await
            .map(|_| MessageResponse::new("Product quantity incremented successfully"));
        report_business(result, |e| MessageResponse::new(e.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn decrement_product_quantity(
        &self,
        req: CartProductRequest,
    ) -> Result<MessageResponse, OrchestratorError> {
        let result = self
            .orchestrator
            .decrement_quantity(&req.user_id, &req.restaurant_id, &req.product_id)
            .await
            .map(|change| match change {
                QuantityChange::NotInCart => MessageResponse::new("Product not found in cart"),
                _ => MessageResponse::new("Product quantity decremented successfully"),
            });
        report_business(result, |e| MessageResponse::new(e.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn remove_product_from_cart(
        &self,
        req: CartProductRequest,
    ) -> Result<MessageResponse, OrchestratorError> {
        let result = self
            .orchestrator
            .remove_line(&req.user_id, &req.restaurant_id, &req.product_id)
            .await
            .map(|()| MessageResponse::new("Product removed from cart successfully"));
        report_business(result, |e| MessageResponse::new(e.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn clear_cart(&self, req: CartRequest) -> Result<MessageResponse, OrchestratorError> {
        self.orchestrator
            .clear_cart(&req.user_id, &req.restaurant_id)
            .await?;
        Ok(MessageResponse::new("Cart cleared successfully"))
    }

    // --- Orders ---

    /// Places the order for one restaurant's cart. `deadline` bounds the whole placement.
    #[instrument(skip(self))]
    pub async fn place_order(
        &self,
        req: PlaceOrderRequest,
        deadline: Option<Instant>,
    ) -> Result<PlaceOrderResponse, OrchestratorError> {
        let result = self
            .orchestrator
            .place_order(PlaceOrder {
                user_id: req.user_id,
                restaurant_id: req.restaurant_id,
                delivery_address_id: req.delivery_address_id,
                deadline,
            })
            .await
            .map(|order| PlaceOrderResponse {
                success: true,
                order_id: Some(order.order_id.clone()),
                order: Some(OrderView::from(&order)),
                message: "Order placed successfully".to_string(),
            });
        report_business(result, |e| PlaceOrderResponse {
            success: false,
            order: None,
            order_id: None,
            message: e.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn get_order_details_all(
        &self,
        req: UserRequest,
    ) -> Result<OrdersResponse, OrchestratorError> {
        let orders = self.orchestrator.orders_for_user(&req.user_id).await?;
        Ok(OrdersResponse {
            orders: orders.iter().map(OrderView::from).collect(),
            message: "Orders retrieved successfully".to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn get_order_details_by_id(
        &self,
        req: OrderIdRequest,
    ) -> Result<OrderDetailsResponse, OrchestratorError> {
        let order = self.orchestrator.order(&req.order_id).await?;
        Ok(OrderDetailsResponse {
            order: OrderView::from(&order),
            message: "Order details retrieved successfully".to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn cancel_order(
        &self,
        req: CancelOrderRequest,
    ) -> Result<StatusResponse, OrchestratorError> {
        let result = self
            .orchestrator
            .cancel_order(&req.order_id, &req.user_id, req.reason.as_deref())
            .await
            .map(|_| StatusResponse {
                success: true,
                message: "Order cancelled successfully".to_string(),
            });
        report_business(result, |e| StatusResponse {
            success: false,
            message: e.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        req: UpdateOrderStatusRequest,
    ) -> Result<StatusResponse, OrchestratorError> {
        let result = match parse_status(&req.new_status) {
            Ok(status) => self
                .orchestrator
                .update_order_status(&req.order_id, &req.restaurant_id, status)
                .await
                .map(|order| StatusResponse {
                    success: true,
                    message: format!("Order status updated to {} successfully", order.status),
                }),
            Err(e) => Err(e),
        };
        report_business(result, |e| StatusResponse {
            success: false,
            message: e.to_string(),
        })
    }

    #[instrument(skip(self))]
    pub async fn confirm_order(
        &self,
        req: ConfirmOrderRequest,
    ) -> Result<ConfirmOrderResponse, OrchestratorError> {
        let result = self
            .orchestrator
            .confirm_order(&req.order_id, &req.restaurant_id)
            .await
            .map(|order| ConfirmOrderResponse {
                success: true,
                message: "Order confirmed successfully".to_string(),
                order_status: order.status.to_string(),
            });
        report_business(result, |e| {
            let status = match &e {
                OrchestratorError::InvalidState { status, .. } => *status,
                _ => OrderStatus::Pending,
            };
            ConfirmOrderResponse {
                success: false,
                message: e.to_string(),
                order_status: status.to_string(),
            }
        })
    }

    #[instrument(skip(self))]
    pub async fn get_restaurant_orders(
        &self,
        req: RestaurantOrdersRequest,
    ) -> Result<OrdersResponse, OrchestratorError> {
        let status = match req.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_status(raw)?),
        };
        let orders = self
            .orchestrator
            .orders_for_restaurant(&req.restaurant_id, status)
            .await?;
        Ok(OrdersResponse {
            orders: orders.iter().map(OrderView::from).collect(),
            message: "Orders retrieved successfully".to_string(),
        })
    }
}
