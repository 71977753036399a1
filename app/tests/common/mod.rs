// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper.

use async_trait::async_trait;
use catalog_app::config::ListSettings;
use catalog_app::models::{Category, Product};
use catalog_app::pipelines::contexts::DiagnosticSink;
use catalog_app::seed::seed_catalog;
use catalog_app::services::CatalogService;
use catalog_app::storage::{AssetStore, CatalogStore, InMemoryCatalogStore, StoreError, StoreResult, StoreStream};
use futures_util::stream::StreamExt;
use futures_util::TryStreamExt;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

// --- Store that records what the pipelines ask of it ---

pub struct RecordingStore {
  inner: InMemoryCatalogStore,
  pub product_saves: AtomicUsize,
  pub product_deletes: AtomicUsize,
  /// Products pulled from `find_all_products` cursors, across all cursors.
  pub products_pulled: Arc<AtomicUsize>,
  pub fail_product_saves: AtomicBool,
  /// Cursor position from which `find_all_products` yields errors.
  pub fail_listing_after: AtomicUsize,
}

impl RecordingStore {
  pub fn new() -> Self {
    Self {
      inner: InMemoryCatalogStore::new(),
      product_saves: AtomicUsize::new(0),
      product_deletes: AtomicUsize::new(0),
      products_pulled: Arc::new(AtomicUsize::new(0)),
      fail_product_saves: AtomicBool::new(false),
      fail_listing_after: AtomicUsize::new(usize::MAX),
    }
  }

  /// The backing store, for arranging and inspecting state without being recorded.
  pub fn inner(&self) -> &InMemoryCatalogStore {
    &self.inner
  }

  pub fn saves(&self) -> usize {
    self.product_saves.load(Ordering::SeqCst)
  }

  pub fn deletes(&self) -> usize {
    self.product_deletes.load(Ordering::SeqCst)
  }

  pub fn pulled(&self) -> usize {
    self.products_pulled.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl CatalogStore for RecordingStore {
  fn find_all_products(&self) -> StoreStream<Product> {
    let pulled = self.products_pulled.clone();
    let fail_after = self.fail_listing_after.load(Ordering::SeqCst);
    self
      .inner
      .find_all_products()
      .enumerate()
      .map(move |(position, item)| {
        pulled.fetch_add(1, Ordering::SeqCst);
        if position >= fail_after {
          Err(StoreError::Unavailable("cursor lost".to_string()))
        } else {
          item
        }
      })
      .boxed()
  }

  async fn find_product_by_id(&self, id: &str) -> StoreResult<Option<Product>> {
    self.inner.find_product_by_id(id).await
  }

  async fn save_product(&self, product: Product) -> StoreResult<Product> {
    self.product_saves.fetch_add(1, Ordering::SeqCst);
    if self.fail_product_saves.load(Ordering::SeqCst) {
      return Err(StoreError::Rejected("disk full".to_string()));
    }
    self.inner.save_product(product).await
  }

  async fn delete_product(&self, product: &Product) -> StoreResult<()> {
    self.product_deletes.fetch_add(1, Ordering::SeqCst);
    self.inner.delete_product(product).await
  }

  fn find_all_categories(&self) -> StoreStream<Category> {
    self.inner.find_all_categories()
  }

  async fn find_category_by_id(&self, id: &str) -> StoreResult<Option<Category>> {
    self.inner.find_category_by_id(id).await
  }

  async fn save_category(&self, category: Category) -> StoreResult<Category> {
    self.inner.save_category(category).await
  }
}

// --- Asset store that keeps writes in memory ---

#[derive(Default)]
pub struct MemoryAssetStore {
  pub writes: Mutex<Vec<(String, Vec<u8>)>>,
  pub fail: AtomicBool,
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
  async fn write_bytes(&self, filename: &str, content: &[u8]) -> std::io::Result<PathBuf> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only volume"));
    }
    self.writes.lock().push((filename.to_string(), content.to_vec()));
    Ok(PathBuf::from("/assets").join(filename))
  }
}

// --- Fixture ---

pub struct Fixture {
  pub service: CatalogService,
  pub store: Arc<RecordingStore>,
  pub assets: Arc<MemoryAssetStore>,
  /// Names handed to the diagnostic sink, in emission order.
  pub emitted: Arc<Mutex<Vec<String>>>,
  pub categories: Vec<Category>,
}

impl Fixture {
  pub fn category(&self, name: &str) -> Category {
    self
      .categories
      .iter()
      .find(|c| c.name == name)
      .cloned()
      .unwrap_or_else(|| panic!("no seeded category named {}", name))
  }

  pub fn emitted_count(&self) -> usize {
    self.emitted.lock().len()
  }

  pub async fn stored_products(&self) -> Vec<Product> {
    self.store.inner().find_all_products().try_collect().await.unwrap()
  }
}

pub fn test_settings() -> ListSettings {
  ListSettings {
    repeat_count: 3,
    pace: Duration::from_millis(100),
    lookahead: 2,
  }
}

/// A service over a store holding the sample catalog (4 categories, 14 products).
pub async fn seeded_fixture(settings: ListSettings) -> Fixture {
  setup_tracing();
  let store = Arc::new(RecordingStore::new());
  seed_catalog(store.inner()).await.unwrap();
  let categories: Vec<Category> = store.inner().find_all_categories().try_collect().await.unwrap();

  let assets = Arc::new(MemoryAssetStore::default());
  let emitted = Arc::new(Mutex::new(Vec::new()));
  let sink_log = emitted.clone();
  let sink: DiagnosticSink = Arc::new(move |product: &Product| sink_log.lock().push(product.name.clone()));

  let service = CatalogService::new(store.clone(), assets.clone(), settings).with_diagnostic_sink(sink);
  Fixture {
    service,
    store,
    assets,
    emitted,
    categories,
  }
}

// --- Helper for Tracing Setup ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
