use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Natural key of a cart line: one line per (user, restaurant, product).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartLineKey {
    pub user_id: String,
    pub restaurant_id: String,
    pub product_id: String,
}

impl CartLineKey {
    pub fn new(
        user_id: impl Into<String>,
        restaurant_id: impl Into<String>,
        product_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            restaurant_id: restaurant_id.into(),
            product_id: product_id.into(),
        }
    }
}

impl Display for CartLineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.user_id, self.restaurant_id, self.product_id)
    }
}

/// A product sitting in a user's cart for one restaurant.
///
/// Name, description, category and price are copied from the catalog when the product is
/// first added. They are informational only; placing an order re-reads the catalog.
///
/// # Actor Framework
/// Stored by a [`ResourceActor`](crate::framework::ResourceActor) keyed by
/// [`CartLineKey`]. See [`crate::cart_actor`] for the merge-on-add behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub user_id: String,
    pub restaurant_id: String,
    pub product_id: String,
    pub product_name: String,
    pub description: String,
    pub category: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartLine {
    pub fn key(&self) -> CartLineKey {
        CartLineKey::new(&self.user_id, &self.restaurant_id, &self.product_id)
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Overwrites the quantity of an existing line.
#[derive(Debug, Clone, Copy)]
pub struct CartLineUpdate {
    pub quantity: u32,
}

/// Sum of `unit_price × quantity` over `lines`.
pub fn cart_total<'a>(lines: impl IntoIterator<Item = &'a CartLine>) -> f64 {
    lines.into_iter().map(CartLine::line_total).sum()
}
