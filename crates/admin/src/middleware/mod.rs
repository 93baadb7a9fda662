//! HTTP middleware for the inventory app.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//! 4. `RequireShop` extractor on the inventory routes

pub mod auth;
pub mod session;

pub use auth::{INSTALL_PATH, RequireShop, ShopAuthRejection, set_current_shop, wants_json};
pub use session::{SESSION_COOKIE_NAME, configure, create_session_layer};
