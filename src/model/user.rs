use crate::model::DeliveryAddress;
use serde::{Deserialize, Serialize};

/// A platform user and their saved delivery addresses.
///
/// # Actor Framework
/// Implements [`ActorEntity`](crate::framework::ActorEntity) in
/// [`user_actor::entity`](crate::user_actor::entity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub addresses: Vec<SavedAddress>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            addresses: Vec::new(),
        }
    }

    pub fn address(&self, address_id: &str) -> Option<&SavedAddress> {
        self.addresses.iter().find(|a| a.id == address_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedAddress {
    pub id: String,
    #[serde(flatten)]
    pub address: DeliveryAddress,
}

#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub name: Option<String>,
}
