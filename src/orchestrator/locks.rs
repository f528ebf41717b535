use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type CartId = (String, String);

/// One async mutex per (user, restaurant) cart.
///
/// Holding the guard gives exclusive access to that cart for as long as the guard lives,
/// across any number of awaits. Different carts never contend.
#[derive(Clone, Default)]
pub struct CartLocks {
    locks: Arc<DashMap<CartId, Arc<Mutex<()>>>>,
}

impl CartLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, user_id: &str, restaurant_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry((user_id.to_string(), restaurant_id.to_string()))
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    /// Drops the mutexes nobody is holding or waiting on.
    pub fn prune(&self) -> usize {
        let before = self.locks.len();
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - self.locks.len()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_cart_is_exclusive() {
        let locks = CartLocks::new();
        let guard = locks.acquire("u1", "r1").await;

        let contender = locks.clone();
        let blocked = tokio::time::timeout(Duration::from_millis(50), async move {
            contender.acquire("u1", "r1").await;
        })
        .await;
        assert!(blocked.is_err(), "second acquire must wait for the guard");

        drop(guard);
        let _again = locks.acquire("u1", "r1").await;
    }

    #[tokio::test]
    async fn test_other_carts_do_not_contend() {
        let locks = CartLocks::new();
        let _held = locks.acquire("u1", "r1").await;

        let other = tokio::time::timeout(Duration::from_millis(50), locks.acquire("u1", "r2")).await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_prune_keeps_held_locks() {
        let locks = CartLocks::new();
        let held = locks.acquire("u1", "r1").await;
        drop(locks.acquire("u2", "r1").await);

        assert_eq!(locks.prune(), 1);
        assert_eq!(locks.len(), 1);

        drop(held);
        assert_eq!(locks.prune(), 1);
        assert!(locks.is_empty());
    }
}
