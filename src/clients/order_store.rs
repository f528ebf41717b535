use crate::clients::actor_client::{recover_entity_error, ActorClient};
use crate::framework::{Filter, FrameworkError, ResourceClient};
use crate::model::{Order, OrderStatus, OrderUpdate};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for the order store.
///
/// The store applies status changes as given. Transition rules belong to the
/// [`OrderOrchestrator`](crate::orchestrator::OrderOrchestrator).
#[derive(Clone)]
pub struct OrderStore {
    inner: ResourceClient<Order>,
}

impl OrderStore {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Persists the order together with its items and returns it.
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn create_order(&self, order: Order) -> Result<Order, OrderError> {
        debug!(?order, "create_order called");
        self.inner
            .create(order.clone())
            .await
            .map_err(Self::map_error)?;
        info!(total = order.total_amount, items = order.items.len(), "Order stored");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, order_id: &str) -> Result<Order, OrderError> {
        self.get(order_id.to_string())
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, OrderError> {
        let user_id = user_id.to_string();
        self.inner
            .list(Filter::new(move |order: &Order| order.user_id == user_id))
            .await
            .map_err(Self::map_error)
    }

    /// Orders of a restaurant, optionally restricted to one exact status.
    #[instrument(skip(self))]
    pub async fn list_orders_for_restaurant(
        &self,
        restaurant_id: &str,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, OrderError> {
        let restaurant_id = restaurant_id.to_string();
        self.inner
            .list(Filter::new(move |order: &Order| {
                order.restaurant_id == restaurant_id
                    && status.map_or(true, |wanted| order.status == wanted)
            }))
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        self.inner
            .update(order_id.to_string(), OrderUpdate::Status(status))
            .await
            .map_err(Self::map_error)
    }

    /// Marks the order `CANCELLED` and stores the reason.
    #[instrument(skip(self))]
    pub async fn record_cancellation(
        &self,
        order_id: &str,
        reason: &str,
    ) -> Result<Order, OrderError> {
        self.inner
            .update(
                order_id.to_string(),
                OrderUpdate::Cancellation {
                    reason: reason.to_string(),
                },
            )
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderStore {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> OrderError {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::AlreadyExists(id) => OrderError::AlreadyExists(id),
            FrameworkError::EntityError(inner) => {
                recover_entity_error(inner).unwrap_or_else(OrderError::from)
            }
            other => OrderError::from(other.to_string()),
        }
    }
}
