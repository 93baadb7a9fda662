//! Inventory Manager admin library.
//!
//! This crate provides the merchant-facing inventory page as a library,
//! allowing it to be tested and reused by the binary and the CLI.
//!
//! # Security
//!
//! The database holds one offline Shopify Admin API token per installed
//! shop. Tokens are never sent to the browser; the session cookie only names
//! the shop.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
