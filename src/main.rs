//! Demo run: seeds a restaurant, two products and a user, fills a cart, places the order
//! and lets the restaurant confirm it.

use order_cart::lifecycle::{setup_tracing, Config, OrderSystem};
use order_cart::model::{DeliveryAddress, ProductCreate, RestaurantCreate, UserCreate};
use order_cart::service::{
    AddProductToCartRequest, CartRequest, ConfirmOrderRequest, PlaceOrderRequest,
};
use std::time::Duration;
use tracing::{error, info, Instrument};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenv::dotenv().ok();
    setup_tracing();

    let config = Config::from_env();
    info!(?config, "Starting order cart demo");
    let system = OrderSystem::new(config);

    // Catalog and address book
    let span = tracing::info_span!("seeding");
    let (restaurant_id, user_id, address_id, product_ids) = async {
        let restaurant_id = system
            .restaurants
            .create_restaurant(RestaurantCreate {
                name: "Spice Route".to_string(),
                phone: 9_876_543_210,
            })
            .await?;

        let mut product_ids = Vec::new();
        let menu = [
            ("Paneer Tikka", "Starters", 180.0),
            ("Dal Makhani", "Mains", 220.0),
        ];
        for (name, category, price) in menu {
            let id = system
                .products
                .create_product(ProductCreate {
                    restaurant_id: restaurant_id.clone(),
                    name: name.to_string(),
                    description: format!("House {}", name.to_lowercase()),
                    category: category.to_string(),
                    price,
                    stock: 20,
                })
                .await?;
            product_ids.push(id);
        }

        let user_id = system
            .users
            .create_user(UserCreate {
                name: "Asha".to_string(),
            })
            .await?;
        let address_id = system
            .users
            .add_address(
                &user_id,
                DeliveryAddress {
                    street: "12 MG Road".to_string(),
                    locality: "Indiranagar".to_string(),
                    state: "Karnataka".to_string(),
                    pincode: "560038".to_string(),
                },
            )
            .await?;

        Ok::<_, BoxError>((restaurant_id, user_id, address_id, product_ids))
    }
    .instrument(span)
    .await?;

    // Cart
    for (product_id, quantity) in product_ids.iter().zip([2, 1]) {
        let response = system
            .service
            .add_product_to_cart(AddProductToCartRequest {
                user_id: user_id.clone(),
                product_id: product_id.clone(),
                quantity,
            })
            .await?;
        info!(%product_id, message = %response.message, "Cart updated");
    }
    let cart = system
        .service
        .get_cart_items(CartRequest {
            user_id: user_id.clone(),
            restaurant_id: restaurant_id.clone(),
        })
        .await?;
    println!("{}", serde_json::to_string_pretty(&cart)?);

    // Order
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    let placed = system
        .service
        .place_order(
            PlaceOrderRequest {
                user_id: user_id.clone(),
                restaurant_id: restaurant_id.clone(),
                delivery_address_id: address_id,
            },
            Some(deadline),
        )
        .await?;
    println!("{}", serde_json::to_string_pretty(&placed)?);

    match placed.order_id {
        Some(order_id) => {
            let confirmed = system
                .service
                .confirm_order(ConfirmOrderRequest {
                    order_id,
                    restaurant_id,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&confirmed)?);
        }
        None => error!(message = %placed.message, "Order was not placed"),
    }

    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
