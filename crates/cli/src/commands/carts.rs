//! Cart commands.

use shelf_core::{LineItem, ProductId, Quantity};
use shelf_server::db::{CartRepository, Collections};

use super::CommandError;

/// Parse a `PRODUCT_ID[:QUANTITY]` argument.
///
/// # Errors
///
/// Returns a message if the id is empty or the quantity is not a positive integer.
pub fn parse_line_item(arg: &str) -> Result<LineItem, String> {
    let (id, quantity) = match arg.rsplit_once(':') {
        Some((id, quantity)) => {
            let quantity = quantity
                .parse::<u32>()
                .ok()
                .filter(|q| *q > 0)
                .ok_or_else(|| format!("invalid quantity '{quantity}'"))?;
            (id, quantity)
        }
        None => (arg, 1),
    };

    if id.is_empty() {
        return Err("product id must not be empty".to_string());
    }

    Ok(LineItem {
        product_id: ProductId::new(id),
        quantity: Quantity::from(quantity),
    })
}

/// Create a cart and print its id.
///
/// # Errors
///
/// Returns `CommandError::Repository` if the carts collection cannot be saved.
#[allow(clippy::print_stdout)]
pub async fn create(collections: &Collections, items: Vec<LineItem>) -> Result<(), CommandError> {
    let repo = CartRepository::new(&collections.carts, &collections.products);
    let cart = repo.create(items).await?;

    tracing::info!(cart_id = %cart.id, items = cart.products.len(), "Created cart");
    println!("{}", cart.id);
    Ok(())
}

/// Print every cart, one per line.
///
/// # Errors
///
/// Returns `CommandError::Repository` if the carts collection cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn list(collections: &Collections) -> Result<(), CommandError> {
    let repo = CartRepository::new(&collections.carts, &collections.products);
    let carts = repo.list().await?;

    for cart in &carts {
        let units: Quantity = cart.products.iter().map(|item| item.quantity).sum();
        println!("{}\t{} items\t{} units", cart.id, cart.products.len(), units);
    }
    tracing::info!(count = carts.len(), "Listed carts");
    Ok(())
}
