//! Request and response shapes of [`OrderCartService`](super::OrderCartService).
//!
//! All of them (de)serialize with camelCase field names.

use crate::model::{cart_total, CartLine, DeliveryAddress, Order, OrderItem};
use serde::{Deserialize, Serialize};

// --- Cart ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductToCartRequest {
    pub user_id: String,
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequest {
    pub user_id: String,
    pub restaurant_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub user_id: String,
}

/// Targets one product in one cart (increment, decrement, remove).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProductRequest {
    pub user_id: String,
    pub restaurant_id: String,
    pub product_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: String,
    pub restaurant_id: String,
    pub product_name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            restaurant_id: line.restaurant_id.clone(),
            product_name: line.product_name.clone(),
            description: line.description.clone(),
            category: line.category.clone(),
            price: line.unit_price,
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCartItemsResponse {
    pub items: Vec<CartItemView>,
    pub total_amount: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCartView {
    pub restaurant_id: String,
    pub items: Vec<CartItemView>,
    pub total_amount: f64,
}

impl RestaurantCartView {
    pub fn new(restaurant_id: String, lines: &[CartLine]) -> Self {
        Self {
            restaurant_id,
            items: lines.iter().map(CartItemView::from).collect(),
            total_amount: cart_total(lines),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAllCartsResponse {
    pub carts: Vec<RestaurantCartView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// --- Orders ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub user_id: String,
    pub restaurant_id: String,
    pub delivery_address_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub product_id: String,
    pub product_name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            price: item.unit_price,
            quantity: item.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: String,
    pub user_id: String,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub restaurant_phone: u64,
    pub items: Vec<OrderItemView>,
    pub total_amount: f64,
    pub order_status: String,
    /// RFC 3339, UTC.
    pub created_at: String,
    pub delivery_address_id: String,
    pub delivery_address: DeliveryAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id.clone(),
            user_id: order.user_id.clone(),
            restaurant_id: order.restaurant_id.clone(),
            restaurant_name: order.restaurant_name.clone(),
            restaurant_phone: order.restaurant_phone,
            items: order.items.iter().map(OrderItemView::from).collect(),
            total_amount: order.total_amount,
            order_status: order.status.to_string(),
            created_at: order.created_at.to_rfc3339(),
            delivery_address_id: order.delivery_address_id.clone(),
            delivery_address: order.delivery_address.clone(),
            cancel_reason: order.cancel_reason.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub success: bool,
    pub order: Option<OrderView>,
    pub order_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersResponse {
    pub orders: Vec<OrderView>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIdRequest {
    pub order_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetailsResponse {
    pub order: OrderView,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub order_id: String,
    pub user_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub order_id: String,
    pub restaurant_id: String,
    pub new_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmOrderRequest {
    pub order_id: String,
    pub restaurant_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmOrderResponse {
    pub success: bool,
    pub message: String,
    pub order_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantOrdersRequest {
    pub restaurant_id: String,
    /// Exact status to filter on. Missing or empty means every status.
    #[serde(default)]
    pub status: Option<String>,
}
