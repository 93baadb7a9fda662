//! Core types for Inventory Manager.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod id;
pub mod setting;
pub mod shop;
pub mod status;
pub mod threshold;
pub mod tone;

pub use catalog::{ProductConnection, ProductEdge, ProductNode, VariantConnection, VariantEdge, VariantNode};
pub use id::*;
pub use setting::InventorySetting;
pub use shop::{ShopDomain, ShopDomainError};
pub use status::ProductStatus;
pub use threshold::{DEFAULT_MIN_STOCK, MinStock, MinStockError};
pub use tone::{Emphasis, Tone};
