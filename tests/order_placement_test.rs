mod support;

use order_cart::clients::ActorClient;
use order_cart::lifecycle::Config;
use order_cart::model::{OrderStatus, ProductUpdate};
use order_cart::orchestrator::{OrchestratorError, PlaceOrder};
use order_cart::remote::RemoteError;
use order_cart::service::{
    AddProductToCartRequest, CartRequest, OrderIdRequest, PlaceOrderRequest,
};
use std::time::Duration;
use support::{add_product, seed, test_config, Harness};
use tokio::time::Instant;

async fn add_to_cart(harness: &Harness, user_id: &str, product_id: &str, quantity: u32) {
    let response = harness
        .system
        .service
        .add_product_to_cart(AddProductToCartRequest {
            user_id: user_id.to_string(),
            product_id: product_id.to_string(),
            quantity,
        })
        .await
        .expect("add to cart");
    assert_eq!(response.message, "Product added to cart successfully");
}

fn place(user_id: &str, restaurant_id: &str, address_id: &str) -> PlaceOrderRequest {
    PlaceOrderRequest {
        user_id: user_id.to_string(),
        restaurant_id: restaurant_id.to_string(),
        delivery_address_id: address_id.to_string(),
    }
}

async fn cart_len(harness: &Harness, user_id: &str, restaurant_id: &str) -> usize {
    harness
        .system
        .service
        .get_cart_items(CartRequest {
            user_id: user_id.to_string(),
            restaurant_id: restaurant_id.to_string(),
        })
        .await
        .expect("cart")
        .items
        .len()
}

#[tokio::test]
async fn test_place_order_end_to_end() {
    let harness = Harness::start();
    let seed = seed(&harness.system).await;
    let p1 = add_product(&harness.system, &seed.restaurant_id, "Biryani", 10.0, 5).await;
    add_to_cart(&harness, &seed.user_id, &p1, 2).await;

    let response = harness
        .system
        .service
        .place_order(place(&seed.user_id, &seed.restaurant_id, &seed.address_id), None)
        .await
        .expect("place order");

    assert!(response.success, "{}", response.message);
    assert_eq!(response.message, "Order placed successfully");
    let order = response.order.expect("order view");
    assert_eq!(response.order_id.as_deref(), Some(order.order_id.as_str()));
    assert!(order.order_id.starts_with("order_"));
    assert_eq!(order.total_amount, 20.0);
    assert_eq!(order.order_status, "PENDING");
    assert_eq!(order.restaurant_name, "Spice Route");
    assert_eq!(order.delivery_address.pincode, "560038");
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 2);

    assert_eq!(harness.stock(&p1).await, 3);
    assert_eq!(cart_len(&harness, &seed.user_id, &seed.restaurant_id).await, 0);
    assert_eq!(harness.inventory.count("increment_stock"), 0);

    let stored = harness
        .system
        .orders
        .get_order(&order.order_id)
        .await
        .expect("stored order");
    assert_eq!(stored.status, OrderStatus::Pending);
    assert!(stored.items.iter().all(|item| item.order_id == stored.order_id));

    harness.system.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_invalid_address_restores_stock() {
    let harness = Harness::start();
    let seed = seed(&harness.system).await;
    let p1 = add_product(&harness.system, &seed.restaurant_id, "Biryani", 10.0, 5).await;
    add_to_cart(&harness, &seed.user_id, &p1, 2).await;

    let response = harness
        .system
        .service
        .place_order(place(&seed.user_id, &seed.restaurant_id, "addr_404"), None)
        .await
        .expect("business failure is reported in the response");

    assert!(!response.success);
    assert!(response.order.is_none());
    assert!(response.message.starts_with("invalid delivery address"));
    assert_eq!(harness.stock(&p1).await, 5);
    assert_eq!(harness.inventory.count("decrement_stock"), 1);
    assert_eq!(harness.inventory.count("increment_stock"), 1);
    assert_eq!(cart_len(&harness, &seed.user_id, &seed.restaurant_id).await, 1);

    harness.system.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_insufficient_stock_compensates_earlier_lines() {
    let harness = Harness::start();
    let seed = seed(&harness.system).await;
    let p1 = add_product(&harness.system, &seed.restaurant_id, "Biryani", 10.0, 5).await;
    let p2 = add_product(&harness.system, &seed.restaurant_id, "Lassi", 3.0, 1).await;
    add_to_cart(&harness, &seed.user_id, &p1, 2).await;
    add_to_cart(&harness, &seed.user_id, &p2, 3).await;
    harness
        .system
        .products
        .update_product(
            &p2,
            ProductUpdate {
                name: Some("Sweet Lassi".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("rename");

    let result = harness
        .system
        .service
        .orchestrator()
        .place_order(PlaceOrder {
            user_id: seed.user_id.clone(),
            restaurant_id: seed.restaurant_id.clone(),
            delivery_address_id: seed.address_id.clone(),
            deadline: None,
        })
        .await;

    assert_eq!(
        result,
        Err(OrchestratorError::InsufficientStock {
            product_name: "Sweet Lassi".to_string(),
            available: 1,
            required: 3,
        })
    );
    assert_eq!(harness.stock(&p1).await, 5);
    assert_eq!(harness.stock(&p2).await, 1);
    assert_eq!(harness.inventory.count("decrement_stock"), 1);
    assert_eq!(
        harness.inventory.count(&format!("increment_stock {p1} 2")),
        1
    );
    assert_eq!(cart_len(&harness, &seed.user_id, &seed.restaurant_id).await, 2);

    harness.system.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_empty_cart_touches_no_stock() {
    let harness = Harness::start();
    let seed = seed(&harness.system).await;

    let response = harness
        .system
        .service
        .place_order(place(&seed.user_id, &seed.restaurant_id, &seed.address_id), None)
        .await
        .expect("place order");

    assert!(!response.success);
    assert_eq!(
        response.message,
        format!("cart is empty for restaurant {}", seed.restaurant_id)
    );
    assert_eq!(harness.inventory.count("get_product"), 0);
    assert_eq!(harness.inventory.count("decrement_stock"), 0);

    harness.system.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_banned_restaurant_rejects_cart_and_order() {
    let harness = Harness::start();
    let seed = seed(&harness.system).await;
    let p1 = add_product(&harness.system, &seed.restaurant_id, "Biryani", 10.0, 5).await;
    add_to_cart(&harness, &seed.user_id, &p1, 1).await;

    harness
        .system
        .restaurants
        .ban(&seed.restaurant_id, "hygiene inspection")
        .await
        .expect("ban");

    let response = harness
        .system
        .service
        .place_order(place(&seed.user_id, &seed.restaurant_id, &seed.address_id), None)
        .await
        .expect("place order");
    assert!(!response.success);
    assert_eq!(
        response.message,
        "Restaurant is currently unavailable. Reason: hygiene inspection"
    );
    assert_eq!(harness.inventory.count("decrement_stock"), 0);

    let added = harness
        .system
        .service
        .add_product_to_cart(AddProductToCartRequest {
            user_id: seed.user_id.clone(),
            product_id: p1.clone(),
            quantity: 1,
        })
        .await
        .expect("add to cart");
    assert_eq!(
        added.message,
        "Restaurant is currently unavailable. Reason: hygiene inspection"
    );
    assert_eq!(harness.stock(&p1).await, 5);

    harness.system.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_order_keeps_prices_from_placement_time() {
    let harness = Harness::start();
    let seed = seed(&harness.system).await;
    let p1 = add_product(&harness.system, &seed.restaurant_id, "Biryani", 10.0, 5).await;
    add_to_cart(&harness, &seed.user_id, &p1, 2).await;

    let placed = harness
        .system
        .service
        .place_order(place(&seed.user_id, &seed.restaurant_id, &seed.address_id), None)
        .await
        .expect("place order");
    let order_id = placed.order_id.expect("order id");

    harness
        .system
        .products
        .update_product(
            &p1,
            ProductUpdate {
                price: Some(99.0),
                ..Default::default()
            },
        )
        .await
        .expect("price change");

    let details = harness
        .system
        .service
        .get_order_details_by_id(OrderIdRequest { order_id })
        .await
        .expect("details");
    assert_eq!(details.order.items[0].price, 10.0);
    assert_eq!(details.order.total_amount, 20.0);

    harness.system.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_price_is_read_fresh_at_placement() {
    let harness = Harness::start();
    let seed = seed(&harness.system).await;
    let p1 = add_product(&harness.system, &seed.restaurant_id, "Biryani", 10.0, 5).await;
    add_to_cart(&harness, &seed.user_id, &p1, 2).await;

    harness
        .system
        .products
        .update_product(
            &p1,
            ProductUpdate {
                price: Some(12.5),
                ..Default::default()
            },
        )
        .await
        .expect("price change");

    let placed = harness
        .system
        .service
        .place_order(place(&seed.user_id, &seed.restaurant_id, &seed.address_id), None)
        .await
        .expect("place order");
    assert_eq!(placed.order.expect("order").total_amount, 25.0);

    harness.system.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_concurrent_placements_create_one_order() {
    let harness = Harness::start();
    let seed = seed(&harness.system).await;
    let p1 = add_product(&harness.system, &seed.restaurant_id, "Biryani", 10.0, 5).await;
    add_to_cart(&harness, &seed.user_id, &p1, 2).await;

    let first = harness.system.service.clone();
    let second = harness.system.service.clone();
    let request = place(&seed.user_id, &seed.restaurant_id, &seed.address_id);
    let (a, b) = tokio::join!(
        first.place_order(request.clone(), None),
        second.place_order(request, None)
    );
    let outcomes = [a.expect("first"), b.expect("second")];

    assert_eq!(outcomes.iter().filter(|r| r.success).count(), 1);
    let loser = outcomes.iter().find(|r| !r.success).expect("one failure");
    assert!(loser.message.starts_with("cart is empty"));
    assert_eq!(harness.stock(&p1).await, 3);

    let orders = harness
        .system
        .orders
        .list_orders_for_user(&seed.user_id)
        .await
        .expect("orders");
    assert_eq!(orders.len(), 1);

    drop(first);
    drop(second);
    harness.system.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_deadline_overrun_rolls_back_reservations() {
    let harness = Harness::start();
    let seed = seed(&harness.system).await;
    let p1 = add_product(&harness.system, &seed.restaurant_id, "Biryani", 10.0, 5).await;
    let p2 = add_product(&harness.system, &seed.restaurant_id, "Lassi", 3.0, 5).await;
    add_to_cart(&harness, &seed.user_id, &p1, 2).await;
    add_to_cart(&harness, &seed.user_id, &p2, 1).await;

    // Each decrement takes 200ms: the first fits in the deadline, the second does not.
    harness.inventory.delay_decrements(Duration::from_millis(200));
    let deadline = Instant::now() + Duration::from_millis(300);

    let result = harness
        .system
        .service
        .place_order(
            place(&seed.user_id, &seed.restaurant_id, &seed.address_id),
            Some(deadline),
        )
        .await;

    match result {
        Err(OrchestratorError::Upstream { operation, source }) => {
            assert_eq!(operation, "decrement_stock");
            assert_eq!(source, RemoteError::DeadlineExceeded);
        }
        other => panic!("expected a deadline failure, got {other:?}"),
    }
    assert_eq!(harness.stock(&p1).await, 5);
    assert_eq!(harness.stock(&p2).await, 5);
    assert_eq!(harness.inventory.count(&format!("increment_stock {p1} 2")), 1);
    // The timed-out decrement never reached the inventory; releasing it moves nothing.
    assert_eq!(harness.inventory.count(&format!("increment_stock {p2} 1")), 1);
    assert!(harness.system.service.orchestrator().outbox().is_empty());
    assert_eq!(cart_len(&harness, &seed.user_id, &seed.restaurant_id).await, 2);

    harness.system.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_missing_product_compensates_earlier_lines() {
    let harness = Harness::start();
    let seed = seed(&harness.system).await;
    let p1 = add_product(&harness.system, &seed.restaurant_id, "Biryani", 10.0, 5).await;
    let p2 = add_product(&harness.system, &seed.restaurant_id, "Lassi", 3.0, 5).await;
    add_to_cart(&harness, &seed.user_id, &p1, 2).await;
    add_to_cart(&harness, &seed.user_id, &p2, 1).await;
    harness
        .system
        .products
        .delete(p2.clone())
        .await
        .expect("delist product");

    let result = harness
        .system
        .service
        .orchestrator()
        .place_order(PlaceOrder {
            user_id: seed.user_id.clone(),
            restaurant_id: seed.restaurant_id.clone(),
            delivery_address_id: seed.address_id.clone(),
            deadline: None,
        })
        .await;

    assert_eq!(result, Err(OrchestratorError::ProductNotFound(p2.clone())));
    assert_eq!(harness.stock(&p1).await, 5);
    assert_eq!(harness.inventory.count(&format!("increment_stock {p1} 2")), 1);
    assert_eq!(harness.inventory.count(&format!("decrement_stock {p2}")), 0);
    let orders = harness
        .system
        .orders
        .list_orders_for_user(&seed.user_id)
        .await
        .expect("orders");
    assert!(orders.is_empty());
    assert_eq!(cart_len(&harness, &seed.user_id, &seed.restaurant_id).await, 2);

    harness.system.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_decrement_applied_after_timeout_is_released() {
    let harness = Harness::start_with(Config {
        remote_call_timeout: Duration::from_millis(100),
        ..test_config()
    });
    let seed = seed(&harness.system).await;
    let p1 = add_product(&harness.system, &seed.restaurant_id, "Biryani", 10.0, 5).await;
    add_to_cart(&harness, &seed.user_id, &p1, 2).await;

    // The inventory takes the stock, but its reply arrives after the call timed out.
    harness.inventory.delay_decrement_acks(Duration::from_millis(300));

    let result = harness
        .system
        .service
        .place_order(place(&seed.user_id, &seed.restaurant_id, &seed.address_id), None)
        .await;

    match result {
        Err(OrchestratorError::Upstream { operation, source }) => {
            assert_eq!(operation, "decrement_stock");
            assert_eq!(source, RemoteError::DeadlineExceeded);
        }
        other => panic!("expected a timed-out decrement, got {other:?}"),
    }
    assert_eq!(harness.stock(&p1).await, 5);
    assert_eq!(harness.inventory.count(&format!("increment_stock {p1} 2")), 1);
    assert!(harness.system.service.orchestrator().outbox().is_empty());
    let orders = harness
        .system
        .orders
        .list_orders_for_user(&seed.user_id)
        .await
        .expect("orders");
    assert!(orders.is_empty());

    harness.system.shutdown().await.expect("shutdown");
}
