use crate::clients::actor_client::{recover_entity_error, ActorClient};
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{BanStatus, Restaurant, RestaurantCreate};
use crate::restaurant_actor::{RestaurantAction, RestaurantActionResult, RestaurantError};
use async_trait::async_trait;
use tracing::instrument;

/// Client for interacting with the Restaurant actor.
#[derive(Clone)]
pub struct RestaurantClient {
    inner: ResourceClient<Restaurant>,
}

impl RestaurantClient {
    pub fn new(inner: ResourceClient<Restaurant>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_restaurant(
        &self,
        params: RestaurantCreate,
    ) -> Result<String, RestaurantError> {
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn get_restaurant(&self, id: &str) -> Result<Restaurant, RestaurantError> {
        self.get(id.to_string())
            .await?
            .ok_or_else(|| RestaurantError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn ban(&self, id: &str, reason: &str) -> Result<(), RestaurantError> {
        let action = RestaurantAction::Ban {
            reason: reason.to_string(),
        };
        match self.action(id, action).await? {
            RestaurantActionResult::Ban(()) => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn unban(&self, id: &str) -> Result<(), RestaurantError> {
        match self.action(id, RestaurantAction::Unban).await? {
            RestaurantActionResult::Unban(()) => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn ban_status(&self, id: &str) -> Result<BanStatus, RestaurantError> {
        match self.action(id, RestaurantAction::CheckBan).await? {
            RestaurantActionResult::CheckBan(status) => Ok(status),
            other => Err(unexpected(other)),
        }
    }

    async fn action(
        &self,
        id: &str,
        action: RestaurantAction,
    ) -> Result<RestaurantActionResult, RestaurantError> {
        self.inner
            .perform_action(id.to_string(), action)
            .await
            .map_err(Self::map_error)
    }
}

fn unexpected(result: RestaurantActionResult) -> RestaurantError {
    RestaurantError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}

#[async_trait]
impl ActorClient<Restaurant> for RestaurantClient {
    type Error = RestaurantError;

    fn inner(&self) -> &ResourceClient<Restaurant> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> RestaurantError {
        match e {
            FrameworkError::NotFound(id) => RestaurantError::NotFound(id),
            FrameworkError::EntityError(inner) => {
                recover_entity_error(inner).unwrap_or_else(RestaurantError::from)
            }
            other => RestaurantError::from(other.to_string()),
        }
    }
}
