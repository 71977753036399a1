// catalog_app/src/seed.rs

//! Sample catalog inserted at startup when `SEED_DB` is set.

use crate::models::{Category, Product};
use crate::storage::CatalogStore;
use anyhow::Context;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{info, instrument};

const CATEGORIES: [&str; 4] = ["Electronics", "Sports", "Furniture", "Decoration"];

/// (name, price, index into `CATEGORIES`)
const PRODUCTS: [(&str, Decimal, usize); 14] = [
  ("TV LG 70'", dec!(3609.40), 0),
  ("Sony HD Camera", dec!(680.60), 0),
  ("Mountain Bike", dec!(1800.60), 1),
  ("Monitor 27' LG", dec!(750.00), 0),
  ("Micronics Keyboard", dec!(17.00), 0),
  ("Huawei Phone", dec!(900.00), 0),
  ("Light Switch", dec!(6.00), 3),
  ("Satin Paint", dec!(78.00), 3),
  ("Base Paint", dec!(10.00), 3),
  ("Three-piece Sofa", dec!(10.00), 2),
  ("TV Divider", dec!(10.00), 2),
  ("Two-door Wardrobe", dec!(910.00), 2),
  ("Double Mattress", dec!(710.00), 2),
  ("Office Chair", dec!(540.00), 2),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
  pub categories: usize,
  pub products: usize,
}

/// Saves the sample categories, then the sample products stamped with today's date.
#[instrument(name = "seed::seed_catalog", skip(store))]
pub async fn seed_catalog(store: &dyn CatalogStore) -> anyhow::Result<SeedSummary> {
  let mut categories = Vec::with_capacity(CATEGORIES.len());
  for name in CATEGORIES {
    let saved = store
      .save_category(Category::new(name))
      .await
      .with_context(|| format!("saving category '{}'", name))?;
    info!(category_id = ?saved.id, name = %saved.name, "Category created.");
    categories.push(saved);
  }

  let today = chrono::Local::now().date_naive();
  for (name, price, category_idx) in PRODUCTS {
    let mut product = Product::new(name, price, categories[category_idx].clone());
    product.created_at = Some(today);
    let saved = store
      .save_product(product)
      .await
      .with_context(|| format!("saving product '{}'", name))?;
    info!(product_id = ?saved.id, name = %saved.name, created_at = ?saved.created_at, "Product inserted.");
  }

  info!("Seeding complete.");
  Ok(SeedSummary {
    categories: CATEGORIES.len(),
    products: PRODUCTS.len(),
  })
}
