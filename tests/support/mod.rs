//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use order_cart::clients::{CartStore, OrderStore};
use order_cart::lifecycle::{Config, OrderSystem};
use order_cart::model::{BanStatus, DeliveryAddress, ProductCreate, RestaurantCreate, UserCreate};
use order_cart::orchestrator::OrderOrchestrator;
use order_cart::remote::{
    AddressBook, InventoryClient, ProductInfo, RemoteError, RestaurantInfo,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Test configuration: short remote timeout, no background retry loop.
pub fn test_config() -> Config {
    Config {
        store_buffer_size: 16,
        remote_call_timeout: Duration::from_secs(2),
        compensation_retry_interval: None,
    }
}

/// Wraps an inventory, records every call and can inject failures and delays.
pub struct RecordingInventory {
    inner: Arc<dyn InventoryClient>,
    calls: Mutex<Vec<String>>,
    fail_increments: AtomicBool,
    decrement_delay: Mutex<Option<Duration>>,
    decrement_ack_delay: Mutex<Option<Duration>>,
}

impl RecordingInventory {
    pub fn new(inner: Arc<dyn InventoryClient>) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            fail_increments: AtomicBool::new(false),
            decrement_delay: Mutex::new(None),
            decrement_ack_delay: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn fail_increments(&self, fail: bool) {
        self.fail_increments.store(fail, Ordering::SeqCst);
    }

    /// Holds each decrement back before it reaches the inventory.
    pub fn delay_decrements(&self, delay: Duration) {
        *self.decrement_delay.lock() = Some(delay);
    }

    /// Lets each decrement apply, then holds back the acknowledgement.
    pub fn delay_decrement_acks(&self, delay: Duration) {
        *self.decrement_ack_delay.lock() = Some(delay);
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl InventoryClient for RecordingInventory {
    async fn get_product(&self, product_id: &str) -> Result<ProductInfo, RemoteError> {
        self.record(format!("get_product {product_id}"));
        self.inner.get_product(product_id).await
    }

    async fn get_restaurant(&self, restaurant_id: &str) -> Result<RestaurantInfo, RemoteError> {
        self.record(format!("get_restaurant {restaurant_id}"));
        self.inner.get_restaurant(restaurant_id).await
    }

    async fn check_ban_status(&self, restaurant_id: &str) -> Result<BanStatus, RemoteError> {
        self.record(format!("check_ban_status {restaurant_id}"));
        self.inner.check_ban_status(restaurant_id).await
    }

    async fn decrement_stock(
        &self,
        product_id: &str,
        restaurant_id: &str,
        amount: u32,
        reservation_id: &str,
    ) -> Result<(), RemoteError> {
        self.record(format!("decrement_stock {product_id} {amount}"));
        let delay = *self.decrement_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let result = self
            .inner
            .decrement_stock(product_id, restaurant_id, amount, reservation_id)
            .await;
        let ack_delay = *self.decrement_ack_delay.lock();
        if let Some(delay) = ack_delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn increment_stock(
        &self,
        product_id: &str,
        restaurant_id: &str,
        amount: u32,
        reservation_id: &str,
    ) -> Result<(), RemoteError> {
        self.record(format!("increment_stock {product_id} {amount}"));
        if self.fail_increments.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("inventory offline".to_string()));
        }
        self.inner
            .increment_stock(product_id, restaurant_id, amount, reservation_id)
            .await
    }
}

/// A running system whose orchestrator talks to a [`RecordingInventory`].
pub struct Harness {
    pub system: OrderSystem,
    pub inventory: Arc<RecordingInventory>,
}

impl Harness {
    pub fn start() -> Self {
        Self::start_with(test_config())
    }

    pub fn start_with(config: Config) -> Self {
        let mut recorder = None;
        let system = OrderSystem::with_inventory(config, |inner| {
            let inventory = Arc::new(RecordingInventory::new(inner));
            recorder = Some(inventory.clone());
            inventory as Arc<dyn InventoryClient>
        });
        let inventory = recorder.expect("inventory wrapper is always called");
        Self { system, inventory }
    }

    pub async fn stock(&self, product_id: &str) -> u32 {
        self.system
            .products
            .check_stock(product_id)
            .await
            .expect("stock lookup")
    }
}

/// Ids of a seeded restaurant and a user with one saved address.
pub struct Seed {
    pub restaurant_id: String,
    pub user_id: String,
    pub address_id: String,
}

pub async fn seed(system: &OrderSystem) -> Seed {
    let restaurant_id = system
        .restaurants
        .create_restaurant(RestaurantCreate {
            name: "Spice Route".to_string(),
            phone: 9_876_543_210,
        })
        .await
        .expect("create restaurant");
    let user_id = system
        .users
        .create_user(UserCreate {
            name: "Asha".to_string(),
        })
        .await
        .expect("create user");
    let address_id = system
        .users
        .add_address(&user_id, address())
        .await
        .expect("add address");
    Seed {
        restaurant_id,
        user_id,
        address_id,
    }
}

pub fn address() -> DeliveryAddress {
    DeliveryAddress {
        street: "12 MG Road".to_string(),
        locality: "Indiranagar".to_string(),
        state: "Karnataka".to_string(),
        pincode: "560038".to_string(),
    }
}

pub async fn add_product(
    system: &OrderSystem,
    restaurant_id: &str,
    name: &str,
    price: f64,
    stock: u32,
) -> String {
    system
        .products
        .create_product(ProductCreate {
            restaurant_id: restaurant_id.to_string(),
            name: name.to_string(),
            description: format!("{name} description"),
            category: "Mains".to_string(),
            price,
            stock,
        })
        .await
        .expect("create product")
}

/// An orchestrator on real product, restaurant and user actors, with the cart or the
/// order store swapped.
pub struct Rig {
    pub orchestrator: OrderOrchestrator,
    pub inventory: Arc<RecordingInventory>,
    pub system: OrderSystem,
}

impl Rig {
    /// Reuses a full system for the actors, but swaps the order store.
    pub fn with_order_store(orders: OrderStore) -> Self {
        Self::with_stores(None, Some(orders))
    }

    /// Reuses a full system for the actors, but swaps the cart store.
    pub fn with_cart_store(carts: CartStore) -> Self {
        Self::with_stores(Some(carts), None)
    }

    fn with_stores(carts: Option<CartStore>, orders: Option<OrderStore>) -> Self {
        let Harness { system, inventory } = Harness::start();
        let orchestrator = OrderOrchestrator::new(
            carts.unwrap_or_else(|| system.carts.clone()),
            orders.unwrap_or_else(|| system.orders.clone()),
            inventory.clone(),
            Arc::new(AddressBook::new(system.users.clone())),
            Duration::from_secs(2),
        );
        Self {
            orchestrator,
            inventory,
            system,
        }
    }

    pub async fn shutdown(self) {
        drop(self.orchestrator);
        drop(self.inventory);
        self.system.shutdown().await.expect("clean shutdown");
    }
}
