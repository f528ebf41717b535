//! # Core Actor Framework
//!
//! This module defines the generic building blocks every store in the crate is built on.
//!
//! ## Key Types
//!
//! - [`ActorEntity`]: The trait that all stored resource types must implement.
//! - [`ResourceActor`]: The generic actor that owns a collection of entities.
//! - [`ResourceClient`]: The cloneable client used to talk to an actor.
//! - [`Filter`]: A predicate shipped to the actor for `List` and `DeleteWhere` scans.
//! - [`FrameworkError`]: Errors raised by the plumbing itself (closed channels, missing ids).
//!
//! ## Keys come from the payload
//!
//! A `ResourceActor` is constructed with a *key function* that derives the id of a new
//! entity from its `Create` payload. Stores whose rows have a natural key (a cart line is
//! identified by user, restaurant and product) return that key; stores whose ids are minted
//! elsewhere (orders carry a generated `order_<uuid>`) read it back from the payload; the
//! in-process catalog stand-ins ignore the payload and hand out sequential ids.
//!
//! When a `Create` resolves to an id that is already stored, the existing entity gets a
//! chance to absorb the payload through [`ActorEntity::on_merge`]. Entities that do not
//! override it reject the request with [`FrameworkError::AlreadyExists`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any resource entity must implement to be managed by [`ResourceActor`].
///
/// # Async & Context
/// Hooks are `async` so an entity may consult other actors. The `Context` associated type
/// is injected into every hook by [`ResourceActor::run`], which lets dependencies be bound
/// after the actor is constructed.
#[async_trait]
pub trait ActorEntity: Clone + Debug + Send + Sync + 'static {
    /// The unique identifier for this entity.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// The payload required to create a new instance.
    type Create: Send + Sync + Debug + 'static;

    /// The payload required to update an existing instance.
    type Update: Send + Sync + Debug + 'static;

    /// Enum representing resource-specific operations (e.g. `DecrementStock`).
    type Action: Send + Sync + Debug + 'static;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug + 'static;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync + 'static;

    /// The error type for this entity.
    ///
    /// The framework boxes it into [`FrameworkError::EntityError`]; typed clients downcast it
    /// back so callers only ever see their module's own error enum.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full entity from the id and payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called immediately after the entity is created and before it is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when a `Create` resolves to an id that is already stored.
    ///
    /// Return `Ok(true)` once `params` has been folded into `self`. The default returns
    /// `Ok(false)`, which rejects the request as a duplicate.
    async fn on_merge(
        &mut self,
        _params: Self::Create,
        _ctx: &Self::Context,
    ) -> Result<bool, Self::Error> {
        Ok(false)
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed from the store.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// A predicate evaluated inside the actor against every stored entity.
pub struct Filter<T>(Box<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Filter<T> {
    pub fn new(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(predicate))
    }

    /// A filter that matches everything.
    pub fn all() -> Self {
        Self::new(|_| true)
    }

    pub fn matches(&self, item: &T) -> bool {
        (self.0)(item)
    }
}

impl<T> Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

/// Internal message type sent to the actor to request operations.
///
/// The variants map to CRUD operations on a keyed resource, plus two scans (`List`,
/// `DeleteWhere`) driven by a [`Filter`] and a custom `Action` variant for
/// resource-specific logic.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        filter: Filter<T>,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    DeleteWhere {
        filter: Filter<T>,
        respond_to: Response<usize>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

fn entity_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> FrameworkError {
    FrameworkError::EntityError(Box::new(e))
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

struct Slot<T> {
    seq: u64,
    item: T,
}

/// The generic actor that manages a collection of entities.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the state (`store`) and the
/// receiver end of the channel, and processes one request at a time. A request therefore
/// either applies completely or not at all as far as any other caller can observe, which is
/// what the order store relies on to insert an order together with its items.
///
/// Every stored entity remembers the sequence number it was inserted with, so `List`
/// returns matches in insertion order.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, Slot<T>>,
    next_seq: u64,
    key_fn: Box<dyn Fn(&T::Create) -> T::Id + Send + Sync>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    /// * `key_fn` - Derives the id of a new entity from its `Create` payload.
    pub fn new(
        buffer_size: usize,
        key_fn: impl Fn(&T::Create) -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_seq: 0,
            key_fn: Box::new(key_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    ///
    /// # Context Injection
    /// The `context` argument is injected into every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "CartLine" instead of "order_cart::model::cart::CartLine")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = (self.key_fn)(&params);
                    let result = self.create(id, params, &context).await;
                    match &result {
                        Ok(id) => info!(entity_type, %id, size = self.store.len(), "Created"),
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).map(|slot| slot.item.clone());
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items = self.list(&filter);
                    debug!(entity_type, matched = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    if let Some(slot) = self.store.get_mut(&id) {
                        if let Err(e) = slot.item.on_update(update, &context).await {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(entity_error(e)));
                            continue;
                        }
                        info!(entity_type, %id, "Updated");
                        let _ = respond_to.send(Ok(slot.item.clone()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Some(slot) = self.store.get(&id) {
                        if let Err(e) = slot.item.on_delete(&context).await {
                            warn!(entity_type, %id, error = %e, "on_delete failed");
                            let _ = respond_to.send(Err(entity_error(e)));
                            continue;
                        }
                        self.store.remove(&id);
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::DeleteWhere { filter, respond_to } => {
                    let result = self.delete_where(&filter, &context).await;
                    match &result {
                        Ok(removed) => {
                            info!(entity_type, removed, size = self.store.len(), "Deleted matching")
                        }
                        Err(e) => warn!(entity_type, error = %e, "DeleteWhere failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(slot) = self.store.get_mut(&id) {
                        let result = slot
                            .item
                            .handle_action(action, &context)
                            .await
                            .map_err(entity_error);
                        match &result {
                            Ok(_) => info!(entity_type, %id, "Action ok"),
                            Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn create(
        &mut self,
        id: T::Id,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        if let Some(slot) = self.store.get_mut(&id) {
            return match slot.item.on_merge(params, context).await {
                Ok(true) => Ok(id),
                Ok(false) => Err(FrameworkError::AlreadyExists(id.to_string())),
                Err(e) => Err(entity_error(e)),
            };
        }

        let mut item = T::from_create_params(id.clone(), params).map_err(entity_error)?;
        item.on_create(context).await.map_err(entity_error)?;
        self.next_seq += 1;
        self.store.insert(
            id.clone(),
            Slot {
                seq: self.next_seq,
                item,
            },
        );
        Ok(id)
    }

    fn list(&self, filter: &Filter<T>) -> Vec<T> {
        let mut matched: Vec<&Slot<T>> = self
            .store
            .values()
            .filter(|slot| filter.matches(&slot.item))
            .collect();
        matched.sort_by_key(|slot| slot.seq);
        matched.into_iter().map(|slot| slot.item.clone()).collect()
    }

    /// Removes every matching entity, or none of them if any `on_delete` hook refuses.
    async fn delete_where(
        &mut self,
        filter: &Filter<T>,
        context: &T::Context,
    ) -> Result<usize, FrameworkError> {
        let ids: Vec<T::Id> = self
            .store
            .iter()
            .filter(|(_, slot)| filter.matches(&slot.item))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &ids {
            if let Some(slot) = self.store.get(id) {
                slot.item.on_delete(context).await.map_err(entity_error)?;
            }
        }
        for id in &ids {
            self.store.remove(id);
        }
        Ok(ids.len())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// A type-safe client for interacting with a `ResourceActor`.
///
/// Holds only a sender, so cloning is cheap and clones can be shared across tasks.
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::Create) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn list(&self, filter: Filter<T>) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { filter, respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn delete_where(&self, filter: Filter<T>) -> Result<usize, FrameworkError> {
        self.request(|respond_to| ResourceRequest::DeleteWhere { filter, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Tally {
        key: String,
        count: u32,
        locked: bool,
    }

    #[derive(Debug)]
    struct TallyCreate {
        key: String,
        count: u32,
    }

    #[derive(Debug)]
    struct TallyUpdate {
        count: u32,
    }

    #[derive(Debug)]
    enum TallyAction {
        Lock,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("tally is locked")]
    struct TallyLocked;

    #[async_trait]
    impl ActorEntity for Tally {
        type Id = String;
        type Create = TallyCreate;
        type Update = TallyUpdate;
        type Action = TallyAction;
        type ActionResult = bool;
        type Context = ();
        type Error = TallyLocked;

        fn from_create_params(id: String, params: TallyCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                key: id,
                count: params.count,
                locked: false,
            })
        }

        async fn on_merge(&mut self, params: TallyCreate, _ctx: &()) -> Result<bool, Self::Error> {
            if self.locked {
                return Err(TallyLocked);
            }
            self.count += params.count;
            Ok(true)
        }

        async fn on_update(&mut self, update: TallyUpdate, _ctx: &()) -> Result<(), Self::Error> {
            self.count = update.count;
            Ok(())
        }

        async fn on_delete(&self, _ctx: &()) -> Result<(), Self::Error> {
            if self.locked {
                Err(TallyLocked)
            } else {
                Ok(())
            }
        }

        async fn handle_action(&mut self, action: TallyAction, _ctx: &()) -> Result<bool, Self::Error> {
            match action {
                TallyAction::Lock => {
                    let changed = !self.locked;
                    self.locked = true;
                    Ok(changed)
                }
            }
        }
    }

    fn spawn_tallies() -> ResourceClient<Tally> {
        let (actor, client) = ResourceActor::new(10, |params: &TallyCreate| params.key.clone());
        tokio::spawn(actor.run(()));
        client
    }

    fn tally(key: &str, count: u32) -> TallyCreate {
        TallyCreate {
            key: key.to_string(),
            count,
        }
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_create_on_existing_key_merges() {
        let client = spawn_tallies();

        client.create(tally("a", 2)).await.unwrap();
        client.create(tally("a", 3)).await.unwrap();

        let all = client.list(Filter::all()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].count, 5);
    }

    #[tokio::test]
    async fn test_list_returns_insertion_order() {
        let client = spawn_tallies();
        for key in ["c", "a", "b"] {
            client.create(tally(key, 1)).await.unwrap();
        }

        let keys: Vec<String> = client
            .list(Filter::all())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.key)
            .collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_report_not_found() {
        let client = spawn_tallies();

        let update = client.update("ghost".into(), TallyUpdate { count: 1 }).await;
        assert!(matches!(update, Err(FrameworkError::NotFound(id)) if id == "ghost"));

        let delete = client.delete("ghost".into()).await;
        assert!(matches!(delete, Err(FrameworkError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_where_is_all_or_nothing() {
        let client = spawn_tallies();
        for key in ["x1", "x2", "y1"] {
            client.create(tally(key, 1)).await.unwrap();
        }

        let removed = client
            .delete_where(Filter::new(|t: &Tally| t.key.starts_with('x')))
            .await
            .unwrap();
        assert_eq!(removed, 2);

        client.create(tally("z1", 1)).await.unwrap();
        client.create(tally("z2", 1)).await.unwrap();
        assert!(client.perform_action("z2".into(), TallyAction::Lock).await.unwrap());

        let refused = client
            .delete_where(Filter::new(|t: &Tally| t.key.starts_with('z')))
            .await;
        assert!(matches!(refused, Err(FrameworkError::EntityError(_))));

        let remaining = client.list(Filter::all()).await.unwrap();
        assert_eq!(remaining.len(), 3, "z1 must survive the refused delete");
    }

    #[tokio::test]
    async fn test_merge_hook_errors_are_boxed() {
        let client = spawn_tallies();
        client.create(tally("k", 1)).await.unwrap();
        client.perform_action("k".into(), TallyAction::Lock).await.unwrap();

        match client.create(tally("k", 1)).await {
            Err(FrameworkError::EntityError(e)) => assert!(e.downcast_ref::<TallyLocked>().is_some()),
            other => panic!("expected entity error, got {other:?}"),
        }
    }
}
