//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! im-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `INVENTORY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Migrations live in `crates/admin/migrations/` and create the `inventory`
//! schema: settings, Shopify tokens and sessions.

use thiserror::Error;

use super::{CommandError, connect};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running inventory migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Inventory migrations complete!");
    Ok(())
}
