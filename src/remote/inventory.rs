//! Inventory capability: products, restaurants, ban status and stock.

use super::RemoteError;
use crate::clients::{ProductClient, RestaurantClient};
use crate::model::BanStatus;
use crate::product_actor::ProductError;
use crate::restaurant_actor::RestaurantError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub product_id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantInfo {
    pub restaurant_id: String,
    pub name: String,
    pub phone: u64,
}

/// What the orchestrator needs from the inventory/catalog service.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// Current catalog data for a product. `RemoteError::NotFound` if it does not exist.
    async fn get_product(&self, product_id: &str) -> Result<ProductInfo, RemoteError>;

    async fn get_restaurant(&self, restaurant_id: &str) -> Result<RestaurantInfo, RemoteError>;

    async fn check_ban_status(&self, restaurant_id: &str) -> Result<BanStatus, RemoteError>;

    /// Takes `amount` units under `reservation_id`. Repeating a decrement for the same
    /// reservation takes nothing more.
    async fn decrement_stock(
        &self,
        product_id: &str,
        restaurant_id: &str,
        amount: u32,
        reservation_id: &str,
    ) -> Result<(), RemoteError>;

    /// Gives back what `reservation_id` took. Releasing a reservation whose decrement
    /// never applied succeeds without moving stock, and stops that decrement from
    /// applying later.
    async fn increment_stock(
        &self,
        product_id: &str,
        restaurant_id: &str,
        amount: u32,
        reservation_id: &str,
    ) -> Result<(), RemoteError>;
}

/// In-process inventory backed by the product and restaurant actors.
#[derive(Clone)]
pub struct CatalogInventory {
    products: ProductClient,
    restaurants: RestaurantClient,
}

impl CatalogInventory {
    pub fn new(products: ProductClient, restaurants: RestaurantClient) -> Self {
        Self {
            products,
            restaurants,
        }
    }
}

impl From<ProductError> for RemoteError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::NotFound(id) => RemoteError::NotFound(id),
            ProductError::ActorCommunicationError(msg) => RemoteError::Unavailable(msg),
            rejected => RemoteError::Rejected(rejected.to_string()),
        }
    }
}

impl From<RestaurantError> for RemoteError {
    fn from(e: RestaurantError) -> Self {
        match e {
            RestaurantError::NotFound(id) => RemoteError::NotFound(id),
            RestaurantError::ActorCommunicationError(msg) => RemoteError::Unavailable(msg),
            rejected => RemoteError::Rejected(rejected.to_string()),
        }
    }
}

#[async_trait]
impl InventoryClient for CatalogInventory {
    #[instrument(skip(self))]
    async fn get_product(&self, product_id: &str) -> Result<ProductInfo, RemoteError> {
        let product = self.products.get_product(product_id).await?;
        Ok(ProductInfo {
            product_id: product.id,
            restaurant_id: product.restaurant_id,
            name: product.name,
            description: product.description,
            category: product.category,
            price: product.price,
            stock: product.stock,
        })
    }

    #[instrument(skip(self))]
    async fn get_restaurant(&self, restaurant_id: &str) -> Result<RestaurantInfo, RemoteError> {
        let restaurant = self.restaurants.get_restaurant(restaurant_id).await?;
        Ok(RestaurantInfo {
            restaurant_id: restaurant.id,
            name: restaurant.name,
            phone: restaurant.phone,
        })
    }

    #[instrument(skip(self))]
    async fn check_ban_status(&self, restaurant_id: &str) -> Result<BanStatus, RemoteError> {
        Ok(self.restaurants.ban_status(restaurant_id).await?)
    }

    #[instrument(skip(self))]
    async fn decrement_stock(
        &self,
        product_id: &str,
        restaurant_id: &str,
        amount: u32,
        reservation_id: &str,
    ) -> Result<(), RemoteError> {
        self.products
            .decrement_stock(product_id, restaurant_id, amount, reservation_id)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn increment_stock(
        &self,
        product_id: &str,
        restaurant_id: &str,
        amount: u32,
        reservation_id: &str,
    ) -> Result<(), RemoteError> {
        self.products
            .increment_stock(product_id, restaurant_id, amount, reservation_id)
            .await?;
        Ok(())
    }
}
