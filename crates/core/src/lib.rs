//! Inventory Manager Core - Shared types and inventory view logic.
//!
//! This crate provides the types used across all Inventory Manager components:
//! - `admin` - The merchant-facing inventory page (axum)
//! - `cli` - Command-line tools for migrations and threshold maintenance
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows the view
//! composition to be tested without a server.
//!
//! # Modules
//!
//! - [`types`] - Validated newtypes (shop domains, thresholds, Shopify GIDs),
//!   product status, tones, and the catalog/settings records
//! - [`inventory`] - Flattening, sorting, selection and summary counts for the
//!   inventory table

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod inventory;
pub mod types;

pub use inventory::{
    InventorySummary, Selection, SortColumn, SortDirection, SortState, VariantRow,
    flatten_variants,
};
pub use types::*;
