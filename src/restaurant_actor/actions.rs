/// Custom actions for Restaurant entities.
#[derive(Debug, Clone)]
pub enum RestaurantAction {
    /// Marks the restaurant unavailable for ordering.
    Ban { reason: String },
    Unban,
    /// Reads the current ban status.
    CheckBan,
}

/// Results from RestaurantActions - variants match 1:1 with RestaurantAction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestaurantActionResult {
    Ban(()),
    Unban(()),
    CheckBan(crate::model::BanStatus),
}
