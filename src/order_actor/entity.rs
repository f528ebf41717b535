//! [`ActorEntity`] implementation for [`Order`].
//!
//! Orders arrive fully built (id, items, total) and are stored as one record, so an
//! order and its items become visible together or not at all.

use super::error::OrderError;
use crate::framework::ActorEntity;
use crate::model::{Order, OrderStatus, OrderUpdate};
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Order {
    type Id = String;
    type Create = Order;
    type Update = OrderUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = OrderError;

    fn from_create_params(id: String, params: Order) -> Result<Self, OrderError> {
        if id.is_empty() {
            return Err(OrderError::ValidationError("order id is empty".into()));
        }
        if params.items.is_empty() {
            return Err(OrderError::ValidationError(format!("order {id} has no items")));
        }
        Ok(params)
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &()) -> Result<(), OrderError> {
        match update {
            OrderUpdate::Status(status) => self.status = status,
            OrderUpdate::Cancellation { reason } => {
                self.status = OrderStatus::Cancelled;
                self.cancel_reason = Some(reason);
            }
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), OrderError> {
        Ok(())
    }
}
