//! Custom actions for the Product actor.
//!
//! Stock only ever moves through these actions, handled by
//! [`ActorEntity::handle_action`](crate::framework::ActorEntity::handle_action) on
//! [`Product`](crate::model::Product).

/// Custom actions for Product entities.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Reads the current stock level without modifying it.
    CheckStock,
    /// Removes `amount` units from stock under `reservation_id`.
    ///
    /// Repeating it for a reservation that already holds units changes nothing.
    ///
    /// # Errors
    /// Fails if the product belongs to another restaurant, fewer than `amount` units
    /// remain, or the reservation was already released. Stock is left untouched on failure.
    DecrementStock {
        restaurant_id: String,
        amount: u32,
        reservation_id: String,
    },
    /// Gives back the units held by `reservation_id`.
    ///
    /// A reservation that holds nothing is marked released, so its decrement can no
    /// longer apply.
    IncrementStock {
        restaurant_id: String,
        amount: u32,
        reservation_id: String,
    },
}

/// Results from ProductActions - variants match 1:1 with ProductAction.
/// Each carries the stock level after the action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductActionResult {
    CheckStock(u32),
    DecrementStock(u32),
    IncrementStock(u32),
}
