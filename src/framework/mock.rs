//! # Mock Framework
//!
//! Utilities for testing typed clients and the orchestrator without a real store actor.
//!
//! Two styles are supported:
//!
//! - [`MockClient`] replays a queue of scripted responses (`expect_*().return_ok(..)` /
//!   `return_err(..)`) and is the easiest way to inject store failures.
//! - [`create_mock_client`] hands back the raw receiver so a test can inspect each request
//!   (payload, id, filter) before answering it with [`expect_create`], [`expect_list`] or
//!   [`expect_action`].

use crate::framework::{ActorEntity, Filter, FrameworkError, ResourceClient, ResourceRequest};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the response to send back.
enum Expectation<T: ActorEntity> {
    Create(Result<T::Id, FrameworkError>),
    Get(T::Id, Result<Option<T>, FrameworkError>),
    List(Result<Vec<T>, FrameworkError>),
    Update(T::Id, Result<T, FrameworkError>),
    Delete(T::Id, Result<(), FrameworkError>),
    DeleteWhere(Result<usize, FrameworkError>),
    Action(T::Id, Result<T::ActionResult, FrameworkError>),
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Requests are matched against expectations in FIFO order. A request that does not match
/// the next expectation (wrong kind or wrong id) is recorded as a mismatch and its response
/// channel is dropped, so the caller sees [`FrameworkError::ActorDropped`] and
/// [`MockClient::verify`] fails afterwards.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<Order>::new();
/// mock.expect_create().return_err(FrameworkError::ActorClosed);
///
/// let store = OrderStore::new(mock.client());
/// // drive the code under test...
/// mock.verify();
/// ```
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    mismatches: Arc<Mutex<Vec<String>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let mismatches = Arc::new(Mutex::new(Vec::new()));

        let queue = expectations.clone();
        let failures = mismatches.clone();
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().pop_front();
                if let Err(mismatch) = answer(request, expectation) {
                    failures.lock().push(mismatch);
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            mismatches,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(Expectation::Create)
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(move |response| Expectation::Get(id, response))
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(Expectation::List)
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update(id, response))
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(move |response| Expectation::Delete(id, response))
    }

    pub fn expect_delete_where(&mut self) -> ExpectationBuilder<T, usize> {
        self.builder(Expectation::DeleteWhere)
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(move |response| Expectation::Action(id, response))
    }

    /// Verifies that every expectation was consumed and no request was unexpected.
    pub fn verify(&self) {
        let mismatches = self.mismatches.lock();
        if !mismatches.is_empty() {
            panic!("Unexpected requests: {:?}", *mismatches);
        }
        let remaining = self.expectations.lock().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn builder<R>(
        &self,
        build: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            build: Box::new(build),
        }
    }
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pairs an incoming request with the scripted expectation and sends the response.
fn answer<T: ActorEntity>(
    request: ResourceRequest<T>,
    expectation: Option<Expectation<T>>,
) -> Result<(), String> {
    fn same_id<I: PartialEq + std::fmt::Debug>(got: &I, want: &I) -> Result<(), String> {
        if got == want {
            Ok(())
        } else {
            Err(format!("expected id {want:?}, got {got:?}"))
        }
    }

    match (request, expectation) {
        (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(response))) => {
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get(want, response))) => {
            same_id(&id, &want)?;
            let _ = respond_to.send(response);
        }
        (ResourceRequest::List { respond_to, .. }, Some(Expectation::List(response))) => {
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Update { id, respond_to, .. },
            Some(Expectation::Update(want, response)),
        ) => {
            same_id(&id, &want)?;
            let _ = respond_to.send(response);
        }
        (ResourceRequest::Delete { id, respond_to }, Some(Expectation::Delete(want, response))) => {
            same_id(&id, &want)?;
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::DeleteWhere { respond_to, .. },
            Some(Expectation::DeleteWhere(response)),
        ) => {
            let _ = respond_to.send(response);
        }
        (
            ResourceRequest::Action { id, respond_to, .. },
            Some(Expectation::Action(want, response)),
        ) => {
            same_id(&id, &want)?;
            let _ = respond_to.send(response);
        }
        (request, None) => return Err(format!("no expectation left for {request:?}")),
        (request, Some(_)) => return Err(format!("request kind mismatch: {request:?}")),
    }
    Ok(())
}

/// Builder returned by the `expect_*` methods; finish it with `return_ok` or `return_err`.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Expectations<T>,
    build: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.build)(response);
        self.expectations.lock().push_back(expectation);
    }
}

// =============================================================================
// RECEIVER HELPERS
// =============================================================================

/// Creates a mock client and a receiver for asserting requests.
///
/// # Testing Strategy
/// The client sends messages to a channel the test controls. The test pulls each request
/// off the receiver, asserts on it, and answers through the enclosed `oneshot` sender,
/// which lets it simulate success, failure or delay deterministically.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Returns the next request if it is a Create.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Returns the next request if it is a List.
pub async fn expect_list<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Filter<T>, oneshot::Sender<Result<Vec<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Returns the next request if it is an Action.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}
