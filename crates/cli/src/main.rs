//! Shelf CLI - operator tools for the catalog and cart data files.
//!
//! # Usage
//!
//! ```bash
//! # Create a cart, optionally with line items (PRODUCT_ID[:QUANTITY])
//! shelf-cli carts create --item 3f2a...:2 --item 9c1b...
//!
//! # List carts
//! shelf-cli carts list
//!
//! # Append products from a JSON array of product objects
//! shelf-cli products seed products.seed.json
//!
//! # Replace the whole catalog instead
//! shelf-cli products seed products.seed.json --replace
//!
//! # List products
//! shelf-cli products list
//! ```
//!
//! The data directory and file names come from the same `SHELF_*`
//! environment variables as the server; `--data-dir` overrides the directory.
//! Files are locked the same way the server locks them, so commands are safe
//! to run while it serves requests.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shelf_core::LineItem;

mod commands;

#[derive(Parser)]
#[command(name = "shelf-cli")]
#[command(author, version, about = "Shelf CLI tools")]
struct Cli {
    /// Directory holding the collection files (overrides `SHELF_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage carts
    Carts {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Create a new cart
    Create {
        /// Line item as `PRODUCT_ID[:QUANTITY]` (quantity defaults to 1)
        #[arg(short, long = "item", value_parser = commands::carts::parse_line_item)]
        items: Vec<LineItem>,
    },
    /// List every cart
    List,
}

#[derive(Subcommand)]
enum ProductAction {
    /// Add products from a JSON file
    Seed {
        /// Path to a JSON array of product objects
        file: PathBuf,

        /// Replace the existing catalog instead of appending
        #[arg(long)]
        replace: bool,
    },
    /// List every product
    List,
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
    let collections = commands::open_collections(cli.data_dir)?;

    match cli.command {
        Commands::Carts { action } => match action {
            CartAction::Create { items } => {
                commands::carts::create(&collections, items).await?;
            }
            CartAction::List => commands::carts::list(&collections).await?,
        },
        Commands::Products { action } => match action {
            ProductAction::Seed { file, replace } => {
                commands::products::seed(&collections, &file, replace).await?;
            }
            ProductAction::List => commands::products::list(&collections).await?,
        },
    }
    Ok(())
}
