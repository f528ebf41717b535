//! # Cart Store
//!
//! Typed access to the cart actor. Every query is a [`Filter`] evaluated inside the actor,
//! so listing a cart is a single round trip.

use crate::cart_actor::CartError;
use crate::clients::actor_client::{recover_entity_error, ActorClient};
use crate::framework::{Filter, FrameworkError, ResourceClient};
use crate::model::{CartLine, CartLineKey, CartLineUpdate};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct CartStore {
    inner: ResourceClient<CartLine>,
}

impl CartStore {
    pub fn new(inner: ResourceClient<CartLine>) -> Self {
        Self { inner }
    }

    fn cart_filter(user_id: &str, restaurant_id: &str) -> Filter<CartLine> {
        let (user_id, restaurant_id) = (user_id.to_string(), restaurant_id.to_string());
        Filter::new(move |line: &CartLine| {
            line.user_id == user_id && line.restaurant_id == restaurant_id
        })
    }

    /// Inserts the line, or adds its quantity to the existing line for the same key.
    #[instrument(skip(self, line), fields(key = %line.key(), quantity = line.quantity))]
    pub async fn add_or_merge_line(&self, line: CartLine) -> Result<CartLineKey, CartError> {
        debug!("Sending request");
        self.inner.create(line).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn get_line(&self, key: CartLineKey) -> Result<Option<CartLine>, CartError> {
        self.get(key).await
    }

    /// Lines of one user's cart at one restaurant, in the order they were first added.
    #[instrument(skip(self))]
    pub async fn list_lines(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> Result<Vec<CartLine>, CartError> {
        self.inner
            .list(Self::cart_filter(user_id, restaurant_id))
            .await
            .map_err(Self::map_error)
    }

    /// Every non-empty cart of the user, keyed by restaurant id in ascending order.
    #[instrument(skip(self))]
    pub async fn list_all_grouped_by_restaurant(
        &self,
        user_id: &str,
    ) -> Result<BTreeMap<String, Vec<CartLine>>, CartError> {
        let owner = user_id.to_string();
        let lines = self
            .inner
            .list(Filter::new(move |line: &CartLine| line.user_id == owner))
            .await
            .map_err(Self::map_error)?;

        let mut carts: BTreeMap<String, Vec<CartLine>> = BTreeMap::new();
        for line in lines {
            carts.entry(line.restaurant_id.clone()).or_default().push(line);
        }
        Ok(carts)
    }

    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        key: CartLineKey,
        quantity: u32,
    ) -> Result<CartLine, CartError> {
        self.inner
            .update(key, CartLineUpdate { quantity })
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn remove_line(&self, key: CartLineKey) -> Result<(), CartError> {
        self.delete(key).await
    }

    /// Removes the whole cart. Clearing an empty cart succeeds and returns 0.
    #[instrument(skip(self))]
    pub async fn clear_lines(&self, user_id: &str, restaurant_id: &str) -> Result<usize, CartError> {
        self.inner
            .delete_where(Self::cart_filter(user_id, restaurant_id))
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<CartLine> for CartStore {
    type Error = CartError;

    fn inner(&self) -> &ResourceClient<CartLine> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> CartError {
        match e {
            FrameworkError::NotFound(key) => CartError::NotFound(key),
            FrameworkError::EntityError(inner) => {
                recover_entity_error(inner).unwrap_or_else(CartError::from)
            }
            other => CartError::from(other.to_string()),
        }
    }
}
