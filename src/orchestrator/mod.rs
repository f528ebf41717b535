//! # Order Orchestrator
//!
//! Turns a user's per-restaurant cart into a persisted order while keeping the remote
//! inventory consistent.
//!
//! ## Placement saga
//!
//! ```text
//! lock cart ─► restaurant ─► ban check ─► cart lines ─► for each line:
//!                                                        fresh product ─► stock check ─► decrement
//!           ─► validate address ─► build order ─► persist ─► clear cart ─► unlock
//! ```
//!
//! Every decrement carries a fresh reservation id and is recorded as a [`Reservation`] once
//! it succeeds, or once its outcome is unknown because the call timed out or lost its
//! connection. If anything fails after the first reservation, each reservation is given
//! back with an increment keyed by the same id, which releases at most what that id took.
//! An increment that fails is logged and parked in the [`CompensationOutbox`]; it never
//! replaces the error that caused the rollback.
//!
//! ## Time bounds
//!
//! Each remote call is bounded by the earlier of the caller's deadline and
//! `now + remote_call_timeout`. Compensating increments ignore the caller's deadline and
//! get a fresh `remote_call_timeout` each.
//!
//! ## Concurrency
//!
//! Placement and every cart mutation run inside the cart's [`CartLocks`] section, so two
//! placements for the same cart are serialized and the second one finds the cart empty.

pub mod compensation;
pub mod error;
pub mod locks;

pub use compensation::*;
pub use error::*;
pub use locks::*;

use crate::cart_actor::CartError;
use crate::clients::{CartStore, OrderStore};
use crate::model::{CartLine, CartLineKey, NewOrder, Order, OrderItem, OrderStatus};
use crate::remote::{AddressValidator, InventoryClient, RemoteError, RestaurantInfo};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Input of [`OrderOrchestrator::place_order`].
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub user_id: String,
    pub restaurant_id: String,
    pub delivery_address_id: String,
    /// Absolute deadline for the whole placement, if the caller has one.
    pub deadline: Option<Instant>,
}

/// Outcome of a +1/−1 on a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now holds this many units.
    Updated(u32),
    /// The last unit was taken out and the line removed.
    Removed,
    /// No such product in the cart; nothing changed.
    NotInCart,
}

#[derive(Clone)]
pub struct OrderOrchestrator {
    carts: CartStore,
    orders: OrderStore,
    inventory: Arc<dyn InventoryClient>,
    addresses: Arc<dyn AddressValidator>,
    locks: CartLocks,
    outbox: CompensationOutbox,
    remote_timeout: Duration,
}

impl OrderOrchestrator {
    pub fn new(
        carts: CartStore,
        orders: OrderStore,
        inventory: Arc<dyn InventoryClient>,
        addresses: Arc<dyn AddressValidator>,
        remote_timeout: Duration,
    ) -> Self {
        Self {
            carts,
            orders,
            inventory,
            addresses,
            locks: CartLocks::new(),
            outbox: CompensationOutbox::default(),
            remote_timeout,
        }
    }

    pub fn outbox(&self) -> &CompensationOutbox {
        &self.outbox
    }

    pub fn locks(&self) -> &CartLocks {
        &self.locks
    }

    /// Runs `call` under `min(deadline, now + remote_timeout)`.
    async fn remote<T>(
        &self,
        deadline: Option<Instant>,
        call: impl Future<Output = Result<T, RemoteError>>,
    ) -> Result<T, RemoteError> {
        let bound = Instant::now() + self.remote_timeout;
        let bound = deadline.map_or(bound, |d| d.min(bound));
        tokio::time::timeout_at(bound, call)
            .await
            .unwrap_or(Err(RemoteError::DeadlineExceeded))
    }

    // =========================================================================
    // Placement
    // =========================================================================

    #[instrument(skip(self, request), fields(user_id = %request.user_id, restaurant_id = %request.restaurant_id))]
    pub async fn place_order(&self, request: PlaceOrder) -> Result<Order, OrchestratorError> {
        let _cart = self
            .locks
            .acquire(&request.user_id, &request.restaurant_id)
            .await;
        let deadline = request.deadline;

        let restaurant = self
            .remote(deadline, self.inventory.get_restaurant(&request.restaurant_id))
            .await
            .map_err(OrchestratorError::upstream("get_restaurant"))?;

        let ban = self
            .remote(deadline, self.inventory.check_ban_status(&request.restaurant_id))
            .await
            .map_err(OrchestratorError::upstream("check_ban_status"))?;
        if ban.is_banned {
            return Err(OrchestratorError::BusinessRuleViolation(ban.reason));
        }

        let lines = self
            .carts
            .list_lines(&request.user_id, &request.restaurant_id)
            .await?;
        if lines.is_empty() {
            return Err(OrchestratorError::EmptyCart {
                restaurant_id: request.restaurant_id.clone(),
            });
        }

        let mut reservations = Vec::new();
        let placed = self
            .reserve_and_persist(&request, restaurant, &lines, &mut reservations)
            .await;

        match placed {
            Ok(order) => {
                if let Err(e) = self
                    .carts
                    .clear_lines(&request.user_id, &request.restaurant_id)
                    .await
                {
                    warn!(order_id = %order.order_id, error = %e, "Order placed but cart not cleared");
                }
                info!(order_id = %order.order_id, total = order.total_amount, "Order placed");
                Ok(order)
            }
            Err(e) => {
                warn!(error = %e, reserved = reservations.len(), "Placement failed");
                self.compensate(&reservations, &e).await;
                Err(e)
            }
        }
    }

    /// Steps that run once the cart is known to be non-empty. Every decrement that may have
    /// applied is pushed to `reservations` before moving on, so the caller can roll back.
    async fn reserve_and_persist(
        &self,
        request: &PlaceOrder,
        restaurant: RestaurantInfo,
        lines: &[CartLine],
        reservations: &mut Vec<Reservation>,
    ) -> Result<Order, OrchestratorError> {
        let deadline = request.deadline;
        let mut items = Vec::with_capacity(lines.len());

        for line in lines {
            let product = self
                .remote(deadline, self.inventory.get_product(&line.product_id))
                .await
                .map_err(|e| match e {
                    RemoteError::NotFound(_) => {
                        OrchestratorError::ProductNotFound(line.product_id.clone())
                    }
                    other => OrchestratorError::upstream("get_product")(other),
                })?;

            if product.stock < line.quantity {
                return Err(OrchestratorError::InsufficientStock {
                    product_name: product.name,
                    available: product.stock,
                    required: line.quantity,
                });
            }

            let reservation = Reservation {
                reservation_id: format!("resv_{}", Uuid::new_v4()),
                product_id: line.product_id.clone(),
                restaurant_id: request.restaurant_id.clone(),
                amount: line.quantity,
            };
            let decremented = self
                .remote(
                    deadline,
                    self.inventory.decrement_stock(
                        &reservation.product_id,
                        &reservation.restaurant_id,
                        reservation.amount,
                        &reservation.reservation_id,
                    ),
                )
                .await;
            match decremented {
                Ok(()) => reservations.push(reservation),
                Err(e @ (RemoteError::DeadlineExceeded | RemoteError::Unavailable(_))) => {
                    // The inventory may still apply it: release it with the others.
                    warn!(
                        product_id = %reservation.product_id,
                        reservation_id = %reservation.reservation_id,
                        error = %e,
                        "Decrement outcome unknown"
                    );
                    reservations.push(reservation);
                    return Err(OrchestratorError::upstream("decrement_stock")(e));
                }
                Err(e) => return Err(OrchestratorError::upstream("decrement_stock")(e)),
            }

            items.push(OrderItem {
                order_id: String::new(),
                product_id: line.product_id.clone(),
                product_name: product.name,
                description: product.description,
                category: product.category,
                unit_price: product.price,
                quantity: line.quantity,
            });
        }

        let validation = self
            .remote(
                deadline,
                self.addresses
                    .validate(&request.user_id, &request.delivery_address_id),
            )
            .await
            .map_err(OrchestratorError::upstream("validate_address"))?;
        if !validation.is_valid {
            return Err(OrchestratorError::InvalidAddress(validation.message));
        }
        let delivery_address = validation.address.ok_or_else(|| {
            OrchestratorError::InvalidAddress("address details missing".to_string())
        })?;

        let order = Order::new(NewOrder {
            user_id: request.user_id.clone(),
            restaurant_id: request.restaurant_id.clone(),
            restaurant_name: restaurant.name,
            restaurant_phone: restaurant.phone,
            delivery_address_id: request.delivery_address_id.clone(),
            delivery_address,
            items,
        });

        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(OrchestratorError::upstream("place_order")(
                RemoteError::DeadlineExceeded,
            ));
        }

        self.orders
            .create_order(order)
            .await
            .map_err(|e| OrchestratorError::Persistence(e.into()))
    }

    /// Gives back every reservation. Failures go to the outbox.
    async fn compensate(&self, reservations: &[Reservation], cause: &OrchestratorError) {
        for reservation in reservations {
            let result = self
                .remote(
                    None,
                    self.inventory.increment_stock(
                        &reservation.product_id,
                        &reservation.restaurant_id,
                        reservation.amount,
                        &reservation.reservation_id,
                    ),
                )
                .await;
            match result {
                Ok(()) => info!(
                    product_id = %reservation.product_id,
                    amount = reservation.amount,
                    "Stock restored"
                ),
                Err(e) => {
                    error!(
                        product_id = %reservation.product_id,
                        amount = reservation.amount,
                        error = %e,
                        "Compensation failed, queued for retry"
                    );
                    self.outbox
                        .push(PendingCompensation::new(reservation, cause.to_string()));
                }
            }
        }
    }

    /// Replays every parked compensation once. Failures go back to the outbox with their
    /// attempt counter bumped.
    #[instrument(skip(self))]
    pub async fn retry_compensations(&self) -> RetryReport {
        let mut report = RetryReport::default();
        for mut entry in self.outbox.drain() {
            let result = self
                .remote(
                    None,
                    self.inventory.increment_stock(
                        &entry.product_id,
                        &entry.restaurant_id,
                        entry.amount,
                        &entry.reservation_id,
                    ),
                )
                .await;
            match result {
                Ok(()) => {
                    info!(product_id = %entry.product_id, attempts = entry.attempts + 1, "Compensation delivered");
                    report.succeeded += 1;
                }
                Err(e) => {
                    entry.attempts += 1;
                    warn!(product_id = %entry.product_id, attempts = entry.attempts, error = %e, "Compensation still failing");
                    self.outbox.push(entry);
                    report.requeued += 1;
                }
            }
        }
        report
    }

    // =========================================================================
    // Order lifecycle
    // =========================================================================

    /// Restaurant accepts a `PENDING` order.
    #[instrument(skip(self))]
    pub async fn confirm_order(
        &self,
        order_id: &str,
        restaurant_id: &str,
    ) -> Result<Order, OrchestratorError> {
        let order = self.orders.get_order(order_id).await?;
        check_restaurant(&order, restaurant_id)?;
        if order.status != OrderStatus::Pending {
            return Err(OrchestratorError::InvalidState {
                message: format!("Order cannot be confirmed in status {}", order.status),
                status: order.status,
            });
        }
        Ok(self
            .orders
            .update_status(order_id, OrderStatus::Confirmed)
            .await?)
    }

    /// Owner cancels a `PENDING` order, optionally recording why.
    #[instrument(skip(self))]
    pub async fn cancel_order(
        &self,
        order_id: &str,
        user_id: &str,
        reason: Option<&str>,
    ) -> Result<Order, OrchestratorError> {
        let order = self.orders.get_order(order_id).await?;
        if order.user_id != user_id {
            return Err(OrchestratorError::Unauthorized(
                "Unauthorized to cancel this order".to_string(),
            ));
        }
        if order.status != OrderStatus::Pending {
            return Err(OrchestratorError::InvalidState {
                message: "Order cannot be cancelled in current status".to_string(),
                status: order.status,
            });
        }
        let cancelled = match reason.filter(|r| !r.trim().is_empty()) {
            Some(reason) => self.orders.record_cancellation(order_id, reason).await?,
            None => {
                self.orders
                    .update_status(order_id, OrderStatus::Cancelled)
                    .await?
            }
        };
        Ok(cancelled)
    }

    /// Restaurant moves an order along the status transition table.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        order_id: &str,
        restaurant_id: &str,
        new_status: OrderStatus,
    ) -> Result<Order, OrchestratorError> {
        let order = self.orders.get_order(order_id).await?;
        check_restaurant(&order, restaurant_id)?;
        if !order.status.can_transition_to(new_status) {
            return Err(OrchestratorError::InvalidState {
                message: format!(
                    "Order status cannot change from {} to {}",
                    order.status, new_status
                ),
                status: order.status,
            });
        }
        Ok(self.orders.update_status(order_id, new_status).await?)
    }

    pub async fn order(&self, order_id: &str) -> Result<Order, OrchestratorError> {
        Ok(self.orders.get_order(order_id).await?)
    }

    pub async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>, OrchestratorError> {
        Ok(self.orders.list_orders_for_user(user_id).await?)
    }

    pub async fn orders_for_restaurant(
        &self,
        restaurant_id: &str,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, OrchestratorError> {
        Ok(self
            .orders
            .list_orders_for_restaurant(restaurant_id, status)
            .await?)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Looks the product up in the catalog, checks its restaurant is not banned, and merges
    /// it into the user's cart for that restaurant.
    #[instrument(skip(self))]
    pub async fn add_product_to_cart(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<CartLine, OrchestratorError> {
        if quantity == 0 {
            return Err(OrchestratorError::InvalidRequest(
                "quantity must be greater than zero".to_string(),
            ));
        }

        let product = self
            .remote(None, self.inventory.get_product(product_id))
            .await
            .map_err(|e| match e {
                RemoteError::NotFound(_) => OrchestratorError::ProductNotFound(product_id.to_string()),
                other => OrchestratorError::upstream("get_product")(other),
            })?;

        let ban = self
            .remote(None, self.inventory.check_ban_status(&product.restaurant_id))
            .await
            .map_err(OrchestratorError::upstream("check_ban_status"))?;
        if ban.is_banned {
            return Err(OrchestratorError::BusinessRuleViolation(ban.reason));
        }

        let line = CartLine {
            user_id: user_id.to_string(),
            restaurant_id: product.restaurant_id,
            product_id: product.product_id,
            product_name: product.name,
            description: product.description,
            category: product.category,
            unit_price: product.price,
            quantity,
        };

        let _cart = self.locks.acquire(user_id, &line.restaurant_id).await;
        let key = self.carts.add_or_merge_line(line).await?;
        let merged = self
            .carts
            .get_line(key.clone())
            .await?
            .ok_or_else(|| CartError::NotFound(key.to_string()))?;
        Ok(merged)
    }

    pub async fn cart(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> Result<Vec<CartLine>, OrchestratorError> {
        Ok(self.carts.list_lines(user_id, restaurant_id).await?)
    }

    pub async fn carts(
        &self,
        user_id: &str,
    ) -> Result<BTreeMap<String, Vec<CartLine>>, OrchestratorError> {
        Ok(self.carts.list_all_grouped_by_restaurant(user_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn increment_quantity(
        &self,
        user_id: &str,
        restaurant_id: &str,
        product_id: &str,
    ) -> Result<QuantityChange, OrchestratorError> {
        let _cart = self.locks.acquire(user_id, restaurant_id).await;
        let key = CartLineKey::new(user_id, restaurant_id, product_id);
        let Some(line) = self.carts.get_line(key.clone()).await? else {
            return Ok(QuantityChange::NotInCart);
        };
        let updated = self
            .carts
            .set_quantity(key, line.quantity.saturating_add(1))
            .await?;
        Ok(QuantityChange::Updated(updated.quantity))
    }

    /// Takes one unit out; the last unit removes the line.
    #[instrument(skip(self))]
    pub async fn decrement_quantity(
        &self,
        user_id: &str,
        restaurant_id: &str,
        product_id: &str,
    ) -> Result<QuantityChange, OrchestratorError> {
        let _cart = self.locks.acquire(user_id, restaurant_id).await;
        let key = CartLineKey::new(user_id, restaurant_id, product_id);
        let Some(line) = self.carts.get_line(key.clone()).await? else {
            return Ok(QuantityChange::NotInCart);
        };
        if line.quantity > 1 {
            let updated = self.carts.set_quantity(key, line.quantity - 1).await?;
            Ok(QuantityChange::Updated(updated.quantity))
        } else {
            self.carts.remove_line(key).await?;
            Ok(QuantityChange::Removed)
        }
    }

    #[instrument(skip(self))]
    pub async fn remove_line(
        &self,
        user_id: &str,
        restaurant_id: &str,
        product_id: &str,
    ) -> Result<(), OrchestratorError> {
        let _cart = self.locks.acquire(user_id, restaurant_id).await;
        self.carts
            .remove_line(CartLineKey::new(user_id, restaurant_id, product_id))
            .await
            .map_err(|e| match e {
                CartError::NotFound(_) => {
                    OrchestratorError::NotFound("Product not found in cart".to_string())
                }
                other => other.into(),
            })
    }

    /// Empties the cart and returns how many lines were removed.
    #[instrument(skip(self))]
    pub async fn clear_cart(
        &self,
        user_id: &str,
        restaurant_id: &str,
    ) -> Result<usize, OrchestratorError> {
        let _cart = self.locks.acquire(user_id, restaurant_id).await;
        Ok(self.carts.clear_lines(user_id, restaurant_id).await?)
    }
}

fn check_restaurant(order: &Order, restaurant_id: &str) -> Result<(), OrchestratorError> {
    if order.restaurant_id == restaurant_id {
        Ok(())
    } else {
        Err(OrchestratorError::Unauthorized(
            "Unauthorized: Order does not belong to this restaurant".to_string(),
        ))
    }
}
