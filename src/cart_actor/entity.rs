//! [`ActorEntity`] implementation for [`CartLine`].
//!
//! A `Create` for a key that already has a line is merged into it through `on_merge`
//! instead of being rejected, so "add to cart" is a single request to the actor.

use super::error::CartError;
use crate::framework::ActorEntity;
use crate::model::{CartLine, CartLineKey, CartLineUpdate};
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for CartLine {
    type Id = CartLineKey;
    type Create = CartLine;
    type Update = CartLineUpdate;
    type Action = ();
    type ActionResult = ();
    type Context = ();
    type Error = CartError;

    fn from_create_params(_id: CartLineKey, params: CartLine) -> Result<Self, CartError> {
        if params.quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        Ok(params)
    }

    /// Adds the incoming quantity to the existing line. The stored product snapshot is kept.
    async fn on_merge(&mut self, params: CartLine, _ctx: &()) -> Result<bool, CartError> {
        if params.quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        self.quantity = self.quantity.saturating_add(params.quantity);
        Ok(true)
    }

    async fn on_update(&mut self, update: CartLineUpdate, _ctx: &()) -> Result<(), CartError> {
        if update.quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        self.quantity = update.quantity;
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), CartError> {
        Ok(())
    }
}
