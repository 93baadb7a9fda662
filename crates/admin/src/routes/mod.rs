//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Redirect to the inventory page
//!
//! # Install (Shopify OAuth)
//! GET  /auth                    - Install page, or start OAuth with ?shop=
//! GET  /auth/callback           - OAuth callback
//!
//! # Inventory
//! GET  /app/inventory           - Inventory page (?sort=&direction=&selected=&variant=)
//! GET  /app/inventory/data      - Loader output as JSON
//! POST /app/inventory           - Update a variant's low-stock threshold
//! ```
//!
//! Health checks and static files are mounted in `main.rs`.

pub mod auth;
pub mod inventory;

use axum::{Router, response::Redirect, routing::get};

use crate::state::AppState;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to(inventory::INVENTORY_PATH) }))
        .merge(auth::router())
        .merge(inventory::router())
}
