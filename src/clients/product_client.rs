//! # Product Client
//!
//! High-level API over the `Product` actor: catalog reads and stock movements.

use crate::clients::actor_client::{recover_entity_error, ActorClient};
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{Product, ProductCreate, ProductUpdate};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<String, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: &str) -> Result<Product, ProductError> {
        self.get(id.to_string())
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        self.inner
            .update(id.to_string(), update)
            .await
            .map_err(Self::map_error)
    }

    /// Returns the current stock level.
    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: &str) -> Result<u32, ProductError> {
        match self
            .inner
            .perform_action(id.to_string(), ProductAction::CheckStock)
            .await
            .map_err(Self::map_error)?
        {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Removes `amount` units under `reservation_id` and returns the remaining stock.
    #[instrument(skip(self))]
    pub async fn decrement_stock(
        &self,
        id: &str,
        restaurant_id: &str,
        amount: u32,
        reservation_id: &str,
    ) -> Result<u32, ProductError> {
        debug!("Decrementing {} units of product {}", amount, id);
        let action = ProductAction::DecrementStock {
            restaurant_id: restaurant_id.to_string(),
            amount,
            reservation_id: reservation_id.to_string(),
        };
        match self
            .inner
            .perform_action(id.to_string(), action)
            .await
            .map_err(Self::map_error)?
        {
            ProductActionResult::DecrementStock(remaining) => Ok(remaining),
            other => Err(unexpected(other)),
        }
    }

    /// Releases `reservation_id` and returns the new level.
    #[instrument(skip(self))]
    pub async fn increment_stock(
        &self,
        id: &str,
        restaurant_id: &str,
        amount: u32,
        reservation_id: &str,
    ) -> Result<u32, ProductError> {
        debug!("Incrementing {} units of product {}", amount, id);
        let action = ProductAction::IncrementStock {
            restaurant_id: restaurant_id.to_string(),
            amount,
            reservation_id: reservation_id.to_string(),
        };
        match self
            .inner
            .perform_action(id.to_string(), action)
            .await
            .map_err(Self::map_error)?
        {
            ProductActionResult::IncrementStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> ProductError {
        match e {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            FrameworkError::EntityError(inner) => {
                recover_entity_error(inner).unwrap_or_else(ProductError::from)
            }
            other => ProductError::from(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_action};

    fn spawn_client() -> ProductClient {
        let (actor, client) = crate::product_actor::new(16);
        tokio::spawn(actor.run(()));
        client
    }

    fn samosa(stock: u32) -> ProductCreate {
        ProductCreate {
            restaurant_id: "rest_1".into(),
            name: "Samosa".into(),
            description: "Two pieces".into(),
            category: "Starters".into(),
            price: 3.5,
            stock,
        }
    }

    #[tokio::test]
    async fn test_decrement_sends_restaurant_and_amount() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let task = tokio::spawn(async move {
            product_client
                .decrement_stock("product_1", "rest_1", 5, "resv_1")
                .await
        });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, "product_1");
        match action {
            ProductAction::DecrementStock {
                restaurant_id,
                amount,
                reservation_id,
            } => {
                assert_eq!(restaurant_id, "rest_1");
                assert_eq!(amount, 5);
                assert_eq!(reservation_id, "resv_1");
            }
            other => panic!("Expected DecrementStock, got {other:?}"),
        }
        responder
            .send(Ok(ProductActionResult::DecrementStock(7)))
            .unwrap();

        assert_eq!(task.await.unwrap().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_insufficient_stock_keeps_level() {
        let client = spawn_client();
        let id = client.create_product(samosa(3)).await.unwrap();

        let result = client.decrement_stock(&id, "rest_1", 4, "resv_1").await;
        assert_eq!(
            result,
            Err(ProductError::InsufficientStock {
                product_id: id.clone(),
                requested: 4,
                available: 3,
            })
        );
        assert_eq!(client.check_stock(&id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_stock_moves_only_for_owning_restaurant() {
        let client = spawn_client();
        let id = client.create_product(samosa(3)).await.unwrap();

        let wrong = client.increment_stock(&id, "rest_9", 1, "resv_1").await;
        assert!(matches!(wrong, Err(ProductError::WrongRestaurant { .. })));

        assert_eq!(client.decrement_stock(&id, "rest_1", 2, "resv_1").await.unwrap(), 1);
        assert_eq!(client.increment_stock(&id, "rest_1", 2, "resv_1").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_reservation_moves_stock_once() {
        let client = spawn_client();
        let id = client.create_product(samosa(5)).await.unwrap();

        assert_eq!(client.decrement_stock(&id, "rest_1", 2, "resv_1").await.unwrap(), 3);
        assert_eq!(client.decrement_stock(&id, "rest_1", 2, "resv_1").await.unwrap(), 3);
        assert_eq!(client.increment_stock(&id, "rest_1", 2, "resv_1").await.unwrap(), 5);
        assert_eq!(client.increment_stock(&id, "rest_1", 2, "resv_1").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_release_before_decrement_blocks_it() {
        let client = spawn_client();
        let id = client.create_product(samosa(5)).await.unwrap();

        assert_eq!(client.increment_stock(&id, "rest_1", 2, "resv_1").await.unwrap(), 5);
        assert_eq!(
            client.decrement_stock(&id, "rest_1", 2, "resv_1").await,
            Err(ProductError::ReservationReleased("resv_1".into()))
        );
        assert_eq!(client.check_stock(&id).await.unwrap(), 5);

        assert_eq!(client.decrement_stock(&id, "rest_1", 2, "resv_2").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let client = spawn_client();
        assert_eq!(
            client.get_product("product_404").await,
            Err(ProductError::NotFound("product_404".into()))
        );
        assert!(matches!(
            client.decrement_stock("product_404", "rest_1", 1, "resv_1").await,
            Err(ProductError::NotFound(_))
        ));
    }
}
