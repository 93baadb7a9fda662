//! Domain models for the inventory app.

pub mod session;

pub use session::{CurrentShop, keys as session_keys};
