//! Local catalog commands.
//!
//! # Usage
//!
//! ```bash
//! tcg products add --name "Booster Box" --price 78000 --image content://media/12
//! tcg products list
//! tcg products remove "Booster Box"
//! tcg products fetch --save
//! ```

use clap::Subcommand;

use tcg_store_core::Price;
use tcg_storefront::AppError;
use tcg_storefront::config::StoreConfig;
use tcg_storefront::models::{Product, ProductKey};
use tcg_storefront::remote::CatalogApi;
use tcg_storefront::store::{Catalog, Preferences};

use super::print_json;

#[derive(Subcommand)]
pub enum ProductAction {
    /// Add a product to the local catalog
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Price in whole pesos
        #[arg(short, long)]
        price: i64,

        /// Image reference
        #[arg(short, long, default_value = "")]
        image: String,
    },
    /// List the local catalog
    List {
        #[arg(long)]
        json: bool,
    },
    /// Remove products by name, or by `#id`
    Remove { key: ProductKey },
    /// List products of the main service
    Fetch {
        /// Also add them to the local catalog
        #[arg(long)]
        save: bool,
    },
}

pub async fn run(
    prefs: Preferences,
    config: &StoreConfig,
    action: ProductAction,
) -> Result<(), AppError> {
    let catalog = Catalog::new(prefs);

    match action {
        ProductAction::Add {
            name,
            description,
            price,
            image,
        } => {
            if price < 0 {
                return Err(AppError::BadRequest("price must not be negative".to_string()));
            }
            let product = Product {
                id: None,
                name,
                description,
                price: Price::new(price),
                image,
            };
            catalog.add(&product).await?;
            println!("Added {} ({})", product.name, product.price);
        }
        ProductAction::List { json } => {
            let products = catalog.products();
            if json {
                return print_json(&products);
            }
            print_table(&products);
        }
        ProductAction::Remove { key } => {
            if !catalog.remove(&key).await? {
                return Err(AppError::NotFound(format!("product {key}")));
            }
            println!("Removed {key}");
        }
        ProductAction::Fetch { save } => {
            let products = CatalogApi::new(&config.api)?.products().await?;
            print_table(&products);
            if save {
                for product in &products {
                    catalog.add(product).await?;
                }
                println!("Saved {} products", products.len());
            }
        }
    }
    Ok(())
}

fn print_table(products: &[Product]) {
    if products.is_empty() {
        println!("No products");
    }
    for product in products {
        println!(
            "{:<6} {:<48} {:>12}",
            product.id.map(|id| format!("#{id}")).unwrap_or_default(),
            product.name,
            product.price.to_string()
        );
    }
}
