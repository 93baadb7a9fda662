//! Integration test support for Inventory Manager.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p inventory-manager-integration-tests
//! ```
//!
//! The loader and action run against [`FixtureProducts`] and
//! [`InMemorySettingsStore`], which stand in for the Shopify Admin API and the
//! settings table. Router tests use [`test_app`], whose database pool is lazy
//! and never connects, so only paths that stop before the database are
//! exercised there.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Mutex, MutexGuard, PoisonError};

use axum::Router;
use chrono::Utc;
use inventory_manager_admin::config::{
    AdminConfig, InventoryConfig, LogFormat, ShopifyAppConfig,
};
use inventory_manager_admin::db::{RepositoryError, SettingSeed};
use inventory_manager_admin::middleware::configure;
use inventory_manager_admin::routes;
use inventory_manager_admin::services::{ProductSource, SettingsStore};
use inventory_manager_admin::shopify::AdminShopifyError;
use inventory_manager_admin::state::AppState;
use inventory_manager_core::{
    InventorySetting, MinStock, ProductConnection, ProductEdge, ShopDomain, VariantId,
};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tower_sessions::{MemoryStore, SessionManagerLayer};

/// Client secret used by [`test_config`].
pub const TEST_API_SECRET: &str = "k7Qz2mVw9TbR4nLp8XcY3hJd6FgS1aEu";

// =============================================================================
// Product fixtures
// =============================================================================

/// Canned `products` response for the loader.
pub enum FixtureProducts {
    /// Shopify answers with these products.
    Products(Vec<ProductEdge>),
    /// Shopify rate limits the request.
    RateLimited,
    /// Shopify rejects the token.
    Unauthorized,
}

impl FixtureProducts {
    /// Products from an Admin API `products` connection in JSON.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not a valid connection.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn from_json(value: serde_json::Value) -> Self {
        let connection: ProductConnection =
            serde_json::from_value(value).expect("valid products connection");
        Self::Products(connection.edges)
    }
}

impl ProductSource for FixtureProducts {
    async fn fetch_products(&self) -> Result<Vec<ProductEdge>, AdminShopifyError> {
        match self {
            Self::Products(products) => Ok(products.clone()),
            Self::RateLimited => Err(AdminShopifyError::RateLimited(30)),
            Self::Unauthorized => Err(AdminShopifyError::Unauthorized(
                "Invalid API key or access token".to_string(),
            )),
        }
    }
}

/// Two products: a tee with two sizes and a hat with one untracked variant.
#[must_use]
pub fn sample_products() -> FixtureProducts {
    FixtureProducts::from_json(serde_json::json!({
        "edges": [{
            "node": {
                "id": "gid://shopify/Product/1",
                "title": "Pineapple Tee",
                "status": "ACTIVE",
                "variants": {"edges": [
                    {"node": {"id": "gid://shopify/ProductVariant/11", "title": "Small", "inventoryQuantity": 0}},
                    {"node": {"id": "gid://shopify/ProductVariant/12", "title": "Large", "inventoryQuantity": 3}}
                ]}
            }
        }, {
            "node": {
                "id": "gid://shopify/Product/2",
                "title": "Beach Hat",
                "status": "DRAFT",
                "variants": {"edges": [
                    {"node": {"id": "gid://shopify/ProductVariant/21", "title": "Default Title", "inventoryQuantity": null}}
                ]}
            }
        }]
    }))
}

// =============================================================================
// In-memory settings table
// =============================================================================

/// Settings table kept in memory, unique per `(shop, variant_id)`.
#[derive(Default)]
pub struct InMemorySettingsStore {
    rows: Mutex<Vec<InventorySetting>>,
}

impl InMemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> MutexGuard<'_, Vec<InventorySetting>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of every row, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<InventorySetting> {
        self.rows().clone()
    }

    /// Stored threshold for one variant.
    #[must_use]
    pub fn min_stock(&self, shop: &ShopDomain, variant_id: &str) -> Option<MinStock> {
        self.rows()
            .iter()
            .find(|row| &row.shop == shop && row.variant_id.as_str() == variant_id)
            .map(|row| row.min_stock)
    }
}

impl SettingsStore for InMemorySettingsStore {
    async fn seed_missing(
        &self,
        shop: &ShopDomain,
        seeds: &[SettingSeed],
        min_stock: MinStock,
    ) -> Result<u64, RepositoryError> {
        let mut rows = self.rows();
        let mut created = 0;
        for seed in seeds {
            let exists = rows
                .iter()
                .any(|row| &row.shop == shop && row.variant_id == seed.variant_id);
            if exists {
                continue;
            }
            let id = i32::try_from(rows.len() + 1)
                .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
            let now = Utc::now();
            rows.push(InventorySetting {
                id,
                shop: shop.clone(),
                variant_id: seed.variant_id.clone(),
                product_id: seed.product_id.clone(),
                min_stock,
                created_at: now,
                updated_at: now,
            });
            created += 1;
        }
        Ok(created)
    }

    async fn list_for_shop(
        &self,
        shop: &ShopDomain,
    ) -> Result<Vec<InventorySetting>, RepositoryError> {
        Ok(self
            .rows()
            .iter()
            .filter(|row| &row.shop == shop)
            .cloned()
            .collect())
    }

    async fn update_min_stock(
        &self,
        shop: &ShopDomain,
        variant_id: &VariantId,
        min_stock: MinStock,
    ) -> Result<InventorySetting, RepositoryError> {
        let mut rows = self.rows();
        let row = rows
            .iter_mut()
            .find(|row| &row.shop == shop && &row.variant_id == variant_id)
            .ok_or(RepositoryError::NotFound)?;
        row.min_stock = min_stock;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

// =============================================================================
// Router
// =============================================================================

/// Configuration with fixed test credentials.
#[must_use]
pub fn test_config() -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from("postgres://inventory@localhost:5432/inventory_test"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        shopify: ShopifyAppConfig {
            api_key: "3f9c1e7a5b2d4c6e8a0f1b3d5e7c9a2b".to_string(),
            api_secret: SecretString::from(TEST_API_SECRET),
            api_version: "2026-01".to_string(),
            scopes: vec!["read_products".to_string(), "read_inventory".to_string()],
        },
        inventory: InventoryConfig::default(),
        log_format: LogFormat::Text,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}

/// Full application router with in-memory sessions and a lazy pool.
///
/// # Panics
///
/// Panics if the pool or Shopify client cannot be constructed.
#[must_use]
#[allow(clippy::expect_used)]
pub fn test_app() -> Router {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://inventory@localhost:5432/inventory_test")
        .expect("valid database url");
    let state = AppState::new(config, pool).expect("shopify client");

    routes::routes()
        .layer(configure(SessionManagerLayer::new(MemoryStore::default()), false))
        .with_state(state)
}
