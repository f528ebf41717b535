//! [`ActorEntity`] implementation for [`Restaurant`].

use super::actions::{RestaurantAction, RestaurantActionResult};
use super::error::RestaurantError;
use crate::framework::ActorEntity;
use crate::model::{BanStatus, Restaurant, RestaurantCreate, RestaurantUpdate};
use async_trait::async_trait;

#[async_trait]
impl ActorEntity for Restaurant {
    type Id = String;
    type Create = RestaurantCreate;
    type Update = RestaurantUpdate;
    type Action = RestaurantAction;
    type ActionResult = RestaurantActionResult;
    type Context = ();
    type Error = RestaurantError;

    fn from_create_params(id: String, params: RestaurantCreate) -> Result<Self, RestaurantError> {
        if params.name.trim().is_empty() {
            return Err(RestaurantError::ValidationError("name is empty".into()));
        }
        Ok(Self {
            id,
            name: params.name,
            phone: params.phone,
            ban_reason: None,
        })
    }

    async fn on_update(&mut self, update: RestaurantUpdate, _ctx: &()) -> Result<(), RestaurantError> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: RestaurantAction,
        _ctx: &(),
    ) -> Result<RestaurantActionResult, RestaurantError> {
        match action {
            RestaurantAction::Ban { reason } => {
                self.ban_reason = Some(reason);
                Ok(RestaurantActionResult::Ban(()))
            }
            RestaurantAction::Unban => {
                self.ban_reason = None;
                Ok(RestaurantActionResult::Unban(()))
            }
            RestaurantAction::CheckBan => Ok(RestaurantActionResult::CheckBan(BanStatus {
                is_banned: self.ban_reason.is_some(),
                reason: self.ban_reason.clone().unwrap_or_default(),
            })),
        }
    }
}
