//! Cart commands.
//!
//! Products are named by catalog key: the product name, or `#id` for
//! products carrying a server ID.

use clap::Subcommand;

use tcg_storefront::AppError;
use tcg_storefront::models::{CartLine, ProductKey};
use tcg_storefront::store::{CartManager, Catalog, Preferences};

use super::print_json;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart and its total
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a catalog product
    Add { key: ProductKey },
    /// Add one unit to a cart line
    Inc { key: ProductKey },
    /// Remove one unit from a cart line
    Dec { key: ProductKey },
    /// Drop a cart line
    Remove { key: ProductKey },
    /// Empty the cart
    Clear,
}

pub async fn run(prefs: Preferences, action: CartAction) -> Result<(), AppError> {
    let cart = CartManager::new(prefs.clone());

    match action {
        CartAction::Show { json } => {
            let lines = cart.lines();
            if json {
                return print_json(&lines);
            }
            if lines.is_empty() {
                println!("Cart is empty");
                return Ok(());
            }
            for line in &lines {
                println!(
                    "{:>3} x {:<44} {:>12}",
                    line.quantity,
                    line.product.name,
                    line.subtotal().to_string()
                );
            }
            println!("{} items, total {}", cart.item_count(), cart.total());
        }
        CartAction::Add { key } => {
            let product = Catalog::new(prefs)
                .find(&key)
                .ok_or_else(|| AppError::NotFound(format!("product {key}")))?;
            cart.add(&product).await?;
            println!("Added {} to cart", product.name);
        }
        CartAction::Inc { key } => {
            let line = find_line(&cart, &key)?;
            cart.increment(&line).await?;
        }
        CartAction::Dec { key } => {
            let line = find_line(&cart, &key)?;
            cart.decrement(&line).await?;
        }
        CartAction::Remove { key } => {
            if !cart.remove_key(&key).await? {
                return Err(AppError::NotFound(format!("cart line {key}")));
            }
        }
        CartAction::Clear => {
            cart.clear().await?;
            println!("Cart cleared");
        }
    }
    Ok(())
}

fn find_line(cart: &CartManager, key: &ProductKey) -> Result<CartLine, AppError> {
    cart.lines()
        .into_iter()
        .find(|line| &line.key() == key)
        .ok_or_else(|| AppError::NotFound(format!("cart line {key}")))
}
