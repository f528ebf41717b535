//! [`ActorEntity`] implementation for [`User`].
//!
//! Users own an address book. Address ids are unique per user (`addr_N`), which is all the
//! validator needs since it always checks an address against its owner.

use super::actions::{UserAction, UserActionResult};
use super::error::UserError;
use crate::framework::ActorEntity;
use crate::model::{DeliveryAddress, SavedAddress, User, UserCreate, UserUpdate};
use async_trait::async_trait;

fn validate_address(address: &DeliveryAddress) -> Result<(), UserError> {
    let missing: Vec<&str> = [
        ("street", &address.street),
        ("locality", &address.locality),
        ("state", &address.state),
        ("pincode", &address.pincode),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(UserError::ValidationError(format!(
            "address is missing {}",
            missing.join(", ")
        )))
    }
}

#[async_trait]
impl ActorEntity for User {
    type Id = String;
    type Create = UserCreate;
    type Update = UserUpdate;
    type Action = UserAction;
    type ActionResult = UserActionResult;
    type Context = ();
    type Error = UserError;

    fn from_create_params(id: String, params: UserCreate) -> Result<Self, UserError> {
        Ok(Self::new(id, params.name))
    }

    async fn on_update(&mut self, update: UserUpdate, _ctx: &()) -> Result<(), UserError> {
        if let Some(name) = update.name {
            self.name = name;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: UserAction,
        _ctx: &(),
    ) -> Result<UserActionResult, UserError> {
        match action {
            UserAction::AddAddress(address) => {
                validate_address(&address)?;
                let id = format!("addr_{}", self.addresses.len() + 1);
                self.addresses.push(SavedAddress {
                    id: id.clone(),
                    address,
                });
                Ok(UserActionResult::AddAddress(id))
            }
            UserAction::ValidateAddress(address_id) => Ok(UserActionResult::ValidateAddress(
                self.address(&address_id).cloned(),
            )),
        }
    }
}
