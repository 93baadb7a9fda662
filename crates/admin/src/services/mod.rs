//! Business logic services.
//!
//! # Services
//!
//! - `inventory` - Inventory page loader and threshold action

pub mod inventory;

pub use inventory::{
    LoaderData, ProductSource, SettingsStore, ShopCatalog, ThresholdForm, ThresholdUpdate,
    load_inventory, update_threshold,
};
