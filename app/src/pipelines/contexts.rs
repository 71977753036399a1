// catalog_app/src/pipelines/contexts.rs

//! Request-scoped data carried through each pipeline.
//! Handlers receive these wrapped in `reflow::ContextData`.

use crate::config::ListSettings;
use crate::errors::AppError;
use crate::models::{Product, UploadedFile};
use crate::storage::{AssetStore, CatalogStore};
use futures_util::stream::BoxStream;
use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Receives every product a listing emits, once per emission.
pub type DiagnosticSink = Arc<dyn Fn(&Product) + Send + Sync>;

/// A listing under construction or ready for delivery.
pub type ProductStream = BoxStream<'static, Result<Product, AppError>>;

/// Holds the stream a listing pipeline builds up step by step.
///
/// Streams are `Send` but not `Sync`; the mutex lets the slot live inside a shared
/// context. Each step takes the stream out, wraps it and puts it back.
#[derive(Default)]
pub struct StreamSlot(Mutex<Option<ProductStream>>);

impl StreamSlot {
  pub fn put(&self, stream: ProductStream) {
    *self.0.lock() = Some(stream);
  }

  pub fn take(&self) -> Option<ProductStream> {
    self.0.lock().take()
  }
}

impl fmt::Debug for StreamSlot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("StreamSlot").field(&self.0.lock().is_some()).finish()
  }
}

// --- Product write ---

#[derive(Clone)]
pub struct ProductWriteCtxData {
  pub store: Arc<dyn CatalogStore>,
  pub assets: Arc<dyn AssetStore>,
  pub product: Product,
  pub upload: Option<UploadedFile>,
  pub resolved_category: Option<crate::models::Category>,
  pub generated_filename: Option<String>,
  pub persisted: Option<Product>,
  pub asset_path: Option<PathBuf>,
}

impl ProductWriteCtxData {
  pub fn new(
    store: Arc<dyn CatalogStore>,
    assets: Arc<dyn AssetStore>,
    product: Product,
    upload: Option<UploadedFile>,
  ) -> Self {
    Self {
      store,
      assets,
      product,
      upload,
      resolved_category: None,
      generated_filename: None,
      persisted: None,
      asset_path: None,
    }
  }

  /// The upload, when one was attached with a usable filename.
  pub fn named_upload(&self) -> Option<&UploadedFile> {
    self.upload.as_ref().filter(|u| !u.is_blank())
  }
}

// --- Product listing ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
  /// Everything, as fast as the store yields it.
  Eager,
  /// Each element held back by the configured pace.
  Paced,
  /// The base sequence repeated, without a delivery bound.
  Full,
  /// The base sequence repeated and handed over through a bounded lookahead window.
  Chunked,
}

impl ListMode {
  pub fn is_amplified(self) -> bool {
    matches!(self, ListMode::Full | ListMode::Chunked)
  }
}

pub struct ProductListCtxData {
  pub store: Arc<dyn CatalogStore>,
  pub mode: ListMode,
  pub settings: ListSettings,
  pub sink: DiagnosticSink,
  pub output: StreamSlot,
}

impl ProductListCtxData {
  pub fn new(store: Arc<dyn CatalogStore>, mode: ListMode, settings: ListSettings, sink: DiagnosticSink) -> Self {
    Self {
      store,
      mode,
      settings,
      sink,
      output: StreamSlot::default(),
    }
  }
}

// --- Product lookup / delete ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupIntent {
  Detail,
  Delete,
  /// Absence is answered with a blank product.
  Edit,
  /// Absence, including a blank placeholder, is `ProductNotFound`.
  EditV2,
}

#[derive(Clone)]
pub struct ProductLookupCtxData {
  pub store: Arc<dyn CatalogStore>,
  pub product_id: String,
  pub intent: LookupIntent,
  pub found: Option<Product>,
  pub deleted: bool,
}

impl ProductLookupCtxData {
  pub fn new(store: Arc<dyn CatalogStore>, product_id: impl Into<String>, intent: LookupIntent) -> Self {
    Self {
      store,
      product_id: product_id.into(),
      intent,
      found: None,
      deleted: false,
    }
  }
}
