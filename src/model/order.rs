//! Orders and the item snapshots captured when they are placed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle state of an order.
///
/// New orders start as `Pending`. Restaurants move them forward through
/// [`OrderStatus::can_transition_to`]; owners may only cancel while `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether a restaurant may move an order from `self` to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Pending, Confirmed | Cancelled) => true,
            (Confirmed, Preparing | OutForDelivery | Delivered | Cancelled) => true,
            (Preparing, OutForDelivery | Delivered) => true,
            (OutForDelivery, Delivered) => true,
            _ => false,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "CONFIRMED" => Ok(OrderStatus::Confirmed),
            "PREPARING" => Ok(OrderStatus::Preparing),
            "OUT_FOR_DELIVERY" => Ok(OrderStatus::OutForDelivery),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub street: String,
    pub locality: String,
    pub state: String,
    pub pincode: String,
}

/// Immutable snapshot of a product at the moment the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub order_id: String,
    pub product_id: String,
    pub product_name: String,
    pub description: String,
    pub category: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Everything needed to build an [`Order`] except what the order mints itself
/// (id, status, total, timestamp).
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: String,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub restaurant_phone: u64,
    pub delivery_address_id: String,
    pub delivery_address: DeliveryAddress,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub user_id: String,
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub restaurant_phone: u64,
    pub delivery_address_id: String,
    pub delivery_address: DeliveryAddress,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub cancel_reason: Option<String>,
}

impl Order {
    /// Builds a `PENDING` order with a fresh `order_<uuid>` id.
    ///
    /// The total is computed here from the item snapshots and never recomputed.
    pub fn new(new: NewOrder) -> Self {
        let order_id = format!("order_{}", Uuid::new_v4());
        let items: Vec<OrderItem> = new
            .items
            .into_iter()
            .map(|item| OrderItem {
                order_id: order_id.clone(),
                ..item
            })
            .collect();
        let total_amount = items.iter().map(OrderItem::line_total).sum();

        Self {
            order_id,
            user_id: new.user_id,
            restaurant_id: new.restaurant_id,
            restaurant_name: new.restaurant_name,
            restaurant_phone: new.restaurant_phone,
            delivery_address_id: new.delivery_address_id,
            delivery_address: new.delivery_address,
            items,
            total_amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            cancel_reason: None,
        }
    }
}

/// Store-level mutations of an order. The store applies them without transition checks.
#[derive(Debug, Clone)]
pub enum OrderUpdate {
    Status(OrderStatus),
    Cancellation { reason: String },
}
