// catalog_app/src/storage/mod.rs

//! Ports to the collaborators the pipelines depend on: the document store holding
//! products and categories, and the asset store holding uploaded image bytes.

pub mod assets;
pub mod memory;

pub use assets::FsAssetStore;
pub use memory::InMemoryCatalogStore;

use crate::models::{Category, Product};
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use std::path::PathBuf;
use thiserror::Error;

/// Opaque failure reported by a store backend. The pipelines pass it through unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
  #[error("store unavailable: {0}")]
  Unavailable(String),

  #[error("store rejected the operation: {0}")]
  Rejected(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A lazily pulled sequence of store records.
pub type StoreStream<T> = BoxStream<'static, StoreResult<T>>;

/// Non-blocking CRUD over products and categories.
///
/// Implementations must be safe for concurrent independent calls; callers add no locking.
#[async_trait]
pub trait CatalogStore: Send + Sync {
  fn find_all_products(&self) -> StoreStream<Product>;

  async fn find_product_by_id(&self, id: &str) -> StoreResult<Option<Product>>;

  /// Assigns an id when the product has none, otherwise replaces the stored record.
  async fn save_product(&self, product: Product) -> StoreResult<Product>;

  async fn delete_product(&self, product: &Product) -> StoreResult<()>;

  fn find_all_categories(&self) -> StoreStream<Category>;

  async fn find_category_by_id(&self, id: &str) -> StoreResult<Option<Category>>;

  async fn save_category(&self, category: Category) -> StoreResult<Category>;
}

/// Durable storage for uploaded bytes, addressed by filename.
#[async_trait]
pub trait AssetStore: Send + Sync {
  /// Writes `content` under `filename` and returns where it landed.
  async fn write_bytes(&self, filename: &str, content: &[u8]) -> std::io::Result<PathBuf>;
}
