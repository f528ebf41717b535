use super::Config;
use crate::clients::{CartStore, OrderStore, ProductClient, RestaurantClient, UserClient};
use crate::orchestrator::OrderOrchestrator;
use crate::remote::{AddressBook, AddressValidator, CatalogInventory, InventoryClient};
use crate::service::OrderCartService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The running service: every store actor, the in-process remote stand-ins, the
/// orchestrator and the request surface on top of it.
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::new(Config::from_env());
///
/// let restaurant_id = system.restaurants.create_restaurant(params).await?;
/// let response = system.service.place_order(request, None).await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Request surface used by callers.
    pub service: OrderCartService,

    pub carts: CartStore,
    pub orders: OrderStore,

    /// Catalog side of the inventory stand-in; used to seed and inspect products.
    pub products: ProductClient,
    pub restaurants: RestaurantClient,
    /// Address book stand-in.
    pub users: UserClient,

    handles: Vec<JoinHandle<()>>,
    retry_loop: Option<RetryLoop>,
}

struct RetryLoop {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl OrderSystem {
    /// Spawns every actor and wires the system together.
    pub fn new(config: Config) -> Self {
        Self::with_inventory(config, |inventory| inventory)
    }

    /// Like [`new`](Self::new), but lets the caller wrap the inventory the orchestrator
    /// talks to (fault injection, call recording).
    pub fn with_inventory(
        config: Config,
        wrap: impl FnOnce(Arc<dyn InventoryClient>) -> Arc<dyn InventoryClient>,
    ) -> Self {
        let buffer = config.store_buffer_size;

        // 1. Create actors
        let (cart_actor, carts) = crate::cart_actor::new(buffer);
        let (order_actor, orders) = crate::order_actor::new(buffer);
        let (product_actor, products) = crate::product_actor::new(buffer);
        let (restaurant_actor, restaurants) = crate::restaurant_actor::new(buffer);
        let (user_actor, users) = crate::user_actor::new(buffer);

        // 2. Start them; none of them needs a context
        let handles = vec![
            tokio::spawn(cart_actor.run(())),
            tokio::spawn(order_actor.run(())),
            tokio::spawn(product_actor.run(())),
            tokio::spawn(restaurant_actor.run(())),
            tokio::spawn(user_actor.run(())),
        ];

        // 3. Remote stand-ins and the orchestrator
        let inventory: Arc<dyn InventoryClient> = Arc::new(CatalogInventory::new(
            products.clone(),
            restaurants.clone(),
        ));
        let addresses: Arc<dyn AddressValidator> = Arc::new(AddressBook::new(users.clone()));
        let orchestrator = OrderOrchestrator::new(
            carts.clone(),
            orders.clone(),
            wrap(inventory),
            addresses,
            config.remote_call_timeout,
        );

        let retry_loop = config
            .compensation_retry_interval
            .map(|period| spawn_retry_loop(orchestrator.clone(), period));

        info!(
            buffer,
            remote_call_timeout_ms = config.remote_call_timeout.as_millis() as u64,
            retry_loop = retry_loop.is_some(),
            "Order system started"
        );

        Self {
            service: OrderCartService::new(orchestrator),
            carts,
            orders,
            products,
            restaurants,
            users,
            handles,
            retry_loop,
        }
    }

    /// Stops the retry loop, closes every actor's channel and waits for the actors to
    /// drain. Fails if any task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        if let Some(RetryLoop { stop, handle }) = self.retry_loop {
            let _ = stop.send(());
            if let Err(e) = handle.await {
                error!("Retry loop failed: {:?}", e);
                return Err(format!("Retry loop failed: {:?}", e));
            }
        }

        let outstanding = self.service.orchestrator().outbox().len();
        if outstanding > 0 {
            warn!(outstanding, "Shutting down with undelivered compensations");
        }

        // Dropping every client closes the channels; each actor then leaves its loop.
        drop(self.service);
        drop(self.carts);
        drop(self.orders);
        drop(self.products);
        drop(self.restaurants);
        drop(self.users);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

/// Replays the compensation outbox every `period` until `stop` fires.
fn spawn_retry_loop(orchestrator: OrderOrchestrator, period: Duration) -> RetryLoop {
    let (stop, mut stopped) = oneshot::channel();
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        loop {
            tokio::select! {
                _ = &mut stopped => break,
                _ = ticker.tick() => {
                    if !orchestrator.outbox().is_empty() {
                        let report = orchestrator.retry_compensations().await;
                        info!(succeeded = report.succeeded, requeued = report.requeued, "Compensation retry pass");
                    }
                    orchestrator.locks().prune();
                }
            }
        }
    });
    RetryLoop { stop, handle }
}
