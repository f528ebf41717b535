//! Catalog data owned by the inventory side: products with stock, and restaurants with
//! their ban status.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A product on a restaurant's menu.
///
/// # Actor Framework
/// Implements [`ActorEntity`](crate::framework::ActorEntity) in
/// [`product_actor::entity`](crate::product_actor::entity); stock moves through
/// [`ProductAction`](crate::product_actor::ProductAction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: u32,
    /// Stock reservations seen by this product, keyed by reservation id.
    #[serde(skip)]
    pub holds: BTreeMap<String, StockHold>,
}

impl Product {
    pub fn new(id: impl Into<String>, params: ProductCreate) -> Self {
        Self {
            id: id.into(),
            restaurant_id: params.restaurant_id,
            name: params.name,
            description: params.description,
            category: params.category,
            price: params.price,
            stock: params.stock,
            holds: BTreeMap::new(),
        }
    }
}

/// State of one reservation against a product's stock.
///
/// A release that arrives before its decrement leaves a `Released` entry behind, and the
/// late decrement is then refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockHold {
    /// These units were taken and have not been given back.
    Held(u32),
    Released,
}

#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub phone: u64,
    pub ban_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RestaurantCreate {
    pub name: String,
    pub phone: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub phone: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanStatus {
    pub is_banned: bool,
    pub reason: String,
}
