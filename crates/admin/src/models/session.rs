//! Session-related types for shop authentication.
//!
//! Types stored in the session once a shop has installed the app.

use chrono::{DateTime, Utc};
use inventory_manager_core::ShopDomain;
use serde::{Deserialize, Serialize};

/// Session-stored shop identity.
///
/// Set by the OAuth callback; the shop's access token stays in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentShop {
    /// Shop the session belongs to.
    pub shop: ShopDomain,
    /// When the install flow completed.
    pub installed_at: DateTime<Utc>,
}

impl CurrentShop {
    #[must_use]
    pub fn new(shop: ShopDomain) -> Self {
        Self {
            shop,
            installed_at: Utc::now(),
        }
    }
}

/// Session keys for shop authentication data.
pub mod keys {
    /// Key for storing the current shop.
    pub const CURRENT_SHOP: &str = "current_shop";

    /// Key for the OAuth `state` nonce of an install in progress.
    pub const OAUTH_STATE: &str = "shopify_oauth_state";

    /// Key for the shop of an install in progress.
    pub const OAUTH_SHOP: &str = "shopify_oauth_shop";
}
