//! Inventory Manager CLI - Database migrations and threshold maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! im-cli migrate
//!
//! # List a shop's thresholds
//! im-cli thresholds list --shop my-store.myshopify.com
//!
//! # Set one variant's threshold
//! im-cli thresholds set --shop my-store.myshopify.com \
//!     --variant gid://shopify/ProductVariant/123 --min-stock 8
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `thresholds list` - Print stored thresholds for a shop
//! - `thresholds set` - Update one variant's threshold

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "im-cli")]
#[command(author, version, about = "Inventory Manager CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Inspect and update low-stock thresholds
    Thresholds {
        #[command(subcommand)]
        action: ThresholdAction,
    },
}

#[derive(Subcommand)]
enum ThresholdAction {
    /// List stored thresholds for a shop
    List {
        /// Shop domain (`my-store.myshopify.com`)
        #[arg(short, long)]
        shop: String,
    },
    /// Set the threshold of one variant
    Set {
        /// Shop domain (`my-store.myshopify.com`)
        #[arg(short, long)]
        shop: String,

        /// Variant GID (`gid://shopify/ProductVariant/...`)
        #[arg(short, long)]
        variant: String,

        /// New minimum stock level
        #[arg(short, long)]
        min_stock: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Thresholds { action } => match action {
            ThresholdAction::List { shop } => commands::thresholds::list(&shop).await?,
            ThresholdAction::Set {
                shop,
                variant,
                min_stock,
            } => commands::thresholds::set(&shop, &variant, &min_stock).await?,
        },
    }
    Ok(())
}
