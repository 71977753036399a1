// catalog_app/src/storage/memory.rs

use crate::models::{Category, Product};
use crate::storage::{CatalogStore, StoreResult, StoreStream};
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use parking_lot::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Process-local document store. `find_all_*` yield records in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
  products: RwLock<Vec<Product>>,
  categories: RwLock<Vec<Category>>,
}

impl InMemoryCatalogStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn product_count(&self) -> usize {
    self.products.read().len()
  }
}

fn needs_id(id: &Option<String>) -> bool {
  id.as_deref().map_or(true, str::is_empty)
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
  fn find_all_products(&self) -> StoreStream<Product> {
    let snapshot = self.products.read().clone();
    stream::iter(snapshot.into_iter().map(Ok)).boxed()
  }

  async fn find_product_by_id(&self, id: &str) -> StoreResult<Option<Product>> {
    Ok(self.products.read().iter().find(|p| p.id.as_deref() == Some(id)).cloned())
  }

  #[instrument(name = "InMemoryCatalogStore::save_product", skip_all, fields(product_name = %product.name))]
  async fn save_product(&self, mut product: Product) -> StoreResult<Product> {
    if needs_id(&product.id) {
      product.id = Some(Uuid::new_v4().to_string());
    }

    let mut products = self.products.write();
    match products.iter_mut().find(|p| p.id == product.id) {
      Some(existing) => *existing = product.clone(),
      None => products.push(product.clone()),
    }
    debug!(product_id = ?product.id, "Product stored.");
    Ok(product)
  }

  async fn delete_product(&self, product: &Product) -> StoreResult<()> {
    if let Some(id) = product.id.as_deref() {
      self.products.write().retain(|p| p.id.as_deref() != Some(id));
    }
    Ok(())
  }

  fn find_all_categories(&self) -> StoreStream<Category> {
    let snapshot = self.categories.read().clone();
    stream::iter(snapshot.into_iter().map(Ok)).boxed()
  }

  async fn find_category_by_id(&self, id: &str) -> StoreResult<Option<Category>> {
    Ok(self.categories.read().iter().find(|c| c.id.as_deref() == Some(id)).cloned())
  }

  async fn save_category(&self, mut category: Category) -> StoreResult<Category> {
    if needs_id(&category.id) {
      category.id = Some(Uuid::new_v4().to_string());
    }

    let mut categories = self.categories.write();
    match categories.iter_mut().find(|c| c.id == category.id) {
      Some(existing) => *existing = category.clone(),
      None => categories.push(category.clone()),
    }
    Ok(category)
  }
}
