use crate::framework::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::error::Error;

/// Trait for resource-specific clients to inherit standard CRUD operations.
///
/// Provides default `get` and `delete`, so each typed client only writes its own
/// domain methods plus [`ActorClient::map_error`].
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Delete an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}

/// Recovers the entity's own error from [`FrameworkError::EntityError`].
///
/// Falls back to the error text when the boxed error is of another type.
pub fn recover_entity_error<E: Error + 'static>(
    error: Box<dyn Error + Send + Sync>,
) -> Result<E, String> {
    error.downcast::<E>().map(|e| *e).map_err(|other| other.to_string())
}
