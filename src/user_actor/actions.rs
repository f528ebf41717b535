use crate::model::{DeliveryAddress, SavedAddress};

/// Custom actions for User entities.
#[derive(Debug, Clone)]
pub enum UserAction {
    /// Saves a new delivery address and returns its id.
    AddAddress(DeliveryAddress),
    /// Looks up one of the user's saved addresses by id.
    ValidateAddress(String),
}

/// Results from UserActions - variants match 1:1 with UserAction.
#[derive(Debug, Clone, PartialEq)]
pub enum UserActionResult {
    AddAddress(String),
    ValidateAddress(Option<SavedAddress>),
}
