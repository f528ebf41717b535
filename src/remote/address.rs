use super::RemoteError;
use crate::clients::UserClient;
use crate::model::DeliveryAddress;
use crate::user_actor::UserError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressValidation {
    pub is_valid: bool,
    pub message: String,
    pub address: Option<DeliveryAddress>,
}

impl AddressValidation {
    pub fn valid(address: DeliveryAddress) -> Self {
        Self {
            is_valid: true,
            message: "Address is valid".into(),
            address: Some(address),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
            address: None,
        }
    }
}

/// Confirms that a delivery address belongs to a user and returns its fields.
#[async_trait]
pub trait AddressValidator: Send + Sync {
    async fn validate(&self, user_id: &str, address_id: &str)
        -> Result<AddressValidation, RemoteError>;
}

/// In-process validator backed by the user actor's address books.
#[derive(Clone)]
pub struct AddressBook {
    users: UserClient,
}

impl AddressBook {
    pub fn new(users: UserClient) -> Self {
        Self { users }
    }
}

#[async_trait]
impl AddressValidator for AddressBook {
    #[instrument(skip(self))]
    async fn validate(
        &self,
        user_id: &str,
        address_id: &str,
    ) -> Result<AddressValidation, RemoteError> {
        match self.users.find_address(user_id, address_id).await {
            Ok(Some(saved)) => Ok(AddressValidation::valid(saved.address)),
            Ok(None) => Ok(AddressValidation::invalid(format!(
                "address {address_id} does not belong to user {user_id}"
            ))),
            Err(UserError::NotFound(_)) => {
                Ok(AddressValidation::invalid(format!("user {user_id} not found")))
            }
            Err(UserError::ActorCommunicationError(msg)) => Err(RemoteError::Unavailable(msg)),
            Err(other) => Err(RemoteError::Rejected(other.to_string())),
        }
    }
}
