//! [`ActorEntity`] implementation for [`Product`], including stock movements.

use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;
use crate::framework::ActorEntity;
use crate::model::{Product, ProductCreate, ProductUpdate, StockHold};
use async_trait::async_trait;

impl Product {
    fn check_owner(&self, restaurant_id: &str) -> Result<(), ProductError> {
        if self.restaurant_id == restaurant_id {
            Ok(())
        } else {
            Err(ProductError::WrongRestaurant {
                product_id: self.id.clone(),
                restaurant_id: restaurant_id.to_string(),
            })
        }
    }
}

#[async_trait]
impl ActorEntity for Product {
    type Id = String;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Context = ();
    type Error = ProductError;

    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, ProductError> {
        Ok(Self::new(id, params))
    }

    /// # Fields Updated
    /// - `name`: menu name, used by carts and orders created afterwards
    /// - `price`: catalog price, used by orders placed afterwards
    /// - `stock`: absolute stock level
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), ProductError> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ProductAction,
        _ctx: &(),
    ) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::DecrementStock {
                restaurant_id,
                amount,
                reservation_id,
            } => {
                self.check_owner(&restaurant_id)?;
                if amount == 0 {
                    return Err(ProductError::InvalidQuantity(amount));
                }
                match self.holds.get(&reservation_id) {
                    Some(StockHold::Held(_)) => {
                        return Ok(ProductActionResult::DecrementStock(self.stock))
                    }
                    Some(StockHold::Released) => {
                        return Err(ProductError::ReservationReleased(reservation_id))
                    }
                    None => {}
                }
                if self.stock < amount {
                    return Err(ProductError::InsufficientStock {
                        product_id: self.id.clone(),
                        requested: amount,
                        available: self.stock,
                    });
                }
                self.stock -= amount;
                self.holds.insert(reservation_id, StockHold::Held(amount));
                Ok(ProductActionResult::DecrementStock(self.stock))
            }
            ProductAction::IncrementStock {
                restaurant_id,
                amount,
                reservation_id,
            } => {
                self.check_owner(&restaurant_id)?;
                if amount == 0 {
                    return Err(ProductError::InvalidQuantity(amount));
                }
                if let Some(StockHold::Held(held)) =
                    self.holds.insert(reservation_id, StockHold::Released)
                {
                    self.stock = self.stock.saturating_add(held);
                }
                Ok(ProductActionResult::IncrementStock(self.stock))
            }
        }
    }
}
