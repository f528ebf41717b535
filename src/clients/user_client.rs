use crate::clients::actor_client::{recover_entity_error, ActorClient};
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{DeliveryAddress, SavedAddress, User, UserCreate};
use crate::user_actor::{UserAction, UserActionResult, UserError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_user(&self, params: UserCreate) -> Result<String, UserError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Saves an address for the user and returns its id.
    #[instrument(skip(self, address))]
    pub async fn add_address(
        &self,
        user_id: &str,
        address: DeliveryAddress,
    ) -> Result<String, UserError> {
        match self
            .inner
            .perform_action(user_id.to_string(), UserAction::AddAddress(address))
            .await
            .map_err(Self::map_error)?
        {
            UserActionResult::AddAddress(id) => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    /// The saved address, or `None` if the user has no address with that id.
    #[instrument(skip(self))]
    pub async fn find_address(
        &self,
        user_id: &str,
        address_id: &str,
    ) -> Result<Option<SavedAddress>, UserError> {
        match self
            .inner
            .perform_action(
                user_id.to_string(),
                UserAction::ValidateAddress(address_id.to_string()),
            )
            .await
            .map_err(Self::map_error)?
        {
            UserActionResult::ValidateAddress(address) => Ok(address),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: UserActionResult) -> UserError {
    UserError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}

#[async_trait]
impl ActorClient<User> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> UserError {
        match e {
            FrameworkError::NotFound(id) => UserError::NotFound(id),
            FrameworkError::EntityError(inner) => {
                recover_entity_error(inner).unwrap_or_else(UserError::from)
            }
            other => UserError::from(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(street: &str) -> DeliveryAddress {
        DeliveryAddress {
            street: street.into(),
            locality: "Indiranagar".into(),
            state: "Karnataka".into(),
            pincode: "560038".into(),
        }
    }

    #[tokio::test]
    async fn test_address_book() {
        let (actor, client) = crate::user_actor::new(8);
        tokio::spawn(actor.run(()));

        let user_id = client
            .create_user(UserCreate {
                name: "Asha".into(),
            })
            .await
            .unwrap();
        let address_id = client
            .add_address(&user_id, address("12th Main"))
            .await
            .unwrap();
        assert_eq!(address_id, "addr_1");

        let found = client.find_address(&user_id, &address_id).await.unwrap();
        assert_eq!(found.map(|a| a.address.street), Some("12th Main".to_string()));
        assert_eq!(client.find_address(&user_id, "addr_7").await.unwrap(), None);

        let incomplete = client.add_address(&user_id, address(" ")).await;
        assert!(matches!(incomplete, Err(UserError::ValidationError(msg)) if msg.contains("street")));

        let stranger = client.find_address("user_99", &address_id).await;
        assert_eq!(stranger, Err(UserError::NotFound("user_99".into())));
    }
}
