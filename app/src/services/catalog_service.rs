// catalog_app/src/services/catalog_service.rs

//! Caller-facing catalog operations. Each one builds a request-scoped context, runs the
//! pipeline registered for it and reads the outcome back out of the context.

use crate::config::ListSettings;
use crate::errors::{AppError, Result as AppResult};
use crate::models::{Category, Product, UploadedFile};
use crate::pipelines::contexts::{
  DiagnosticSink, ListMode, LookupIntent, ProductListCtxData, ProductLookupCtxData, ProductStream,
  ProductWriteCtxData,
};
use crate::pipelines::{list_pipeline, register_all_pipelines};
use crate::storage::{AssetStore, CatalogStore};
use futures_util::stream::{StreamExt, TryStreamExt};
use reflow::{ContextData, PipelineResult, Reflow};
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct CatalogService {
  store: Arc<dyn CatalogStore>,
  assets: Arc<dyn AssetStore>,
  reflow: Arc<Reflow<AppError>>,
  list_settings: ListSettings,
  sink: DiagnosticSink,
}

impl CatalogService {
  pub fn new(store: Arc<dyn CatalogStore>, assets: Arc<dyn AssetStore>, list_settings: ListSettings) -> Self {
    let reflow = Arc::new(Reflow::<AppError>::new());
    register_all_pipelines(&reflow);
    Self {
      store,
      assets,
      reflow,
      list_settings,
      sink: list_pipeline::log_product_name(),
    }
  }

  /// Replaces the sink that observes every product a listing emits.
  pub fn with_diagnostic_sink(mut self, sink: DiagnosticSink) -> Self {
    self.sink = sink;
    self
  }

  pub fn list_settings(&self) -> &ListSettings {
    &self.list_settings
  }

  async fn run<T>(&self, ctx: ContextData<T>) -> AppResult<()>
  where
    T: 'static + Send + Sync,
  {
    match self.reflow.run(ctx).await? {
      PipelineResult::Completed => Ok(()),
      PipelineResult::Stopped => Err(AppError::PipelineHaltedByHandler),
    }
  }

  /// Creates or updates a product, then stores its uploaded image if one was attached.
  #[instrument(name = "CatalogService::save", skip_all, fields(product_name = %product.name, has_upload = upload.is_some()))]
  pub async fn save(&self, product: Product, upload: Option<UploadedFile>) -> AppResult<Product> {
    let ctx = ContextData::new(ProductWriteCtxData::new(
      self.store.clone(),
      self.assets.clone(),
      product,
      upload,
    ));
    self.run(ctx.clone()).await?;

    let persisted = ctx.write().persisted.take();
    persisted.ok_or_else(|| AppError::Internal("product write pipeline finished without a saved product".to_string()))
  }

  /// A lazily evaluated listing with upper-cased names. Dropping the stream stops it.
  #[instrument(name = "CatalogService::list", skip(self))]
  pub async fn list(&self, mode: ListMode) -> AppResult<ProductStream> {
    let ctx = ContextData::new(ProductListCtxData::new(
      self.store.clone(),
      mode,
      self.list_settings.clone(),
      self.sink.clone(),
    ));
    self.run(ctx.clone()).await?;

    let stream = ctx.read().output.take();
    stream.ok_or_else(|| AppError::Internal("listing pipeline produced no stream".to_string()))
  }

  async fn lookup(&self, id: &str, intent: LookupIntent) -> AppResult<ContextData<ProductLookupCtxData>> {
    let ctx = ContextData::new(ProductLookupCtxData::new(self.store.clone(), id, intent));
    self.run(ctx.clone()).await?;
    Ok(ctx)
  }

  fn found(ctx: &ContextData<ProductLookupCtxData>) -> AppResult<Product> {
    let found = ctx.write().found.take();
    found.ok_or_else(|| AppError::Internal("lookup pipeline finished without a product".to_string()))
  }

  #[instrument(name = "CatalogService::delete", skip(self))]
  pub async fn delete(&self, id: &str) -> AppResult<()> {
    let ctx = self.lookup(id, LookupIntent::Delete).await?;
    let deleted = ctx.read().deleted;
    if !deleted {
      return Err(AppError::Internal(format!("product {} was found but not deleted", id)));
    }
    Ok(())
  }

  #[instrument(name = "CatalogService::detail", skip(self))]
  pub async fn detail(&self, id: &str) -> AppResult<Product> {
    let ctx = self.lookup(id, LookupIntent::Detail).await?;
    Self::found(&ctx)
  }

  /// Never fails with `ProductNotFound`: an unknown id yields a blank product.
  #[instrument(name = "CatalogService::edit", skip(self))]
  pub async fn edit(&self, id: &str) -> AppResult<Product> {
    let ctx = self.lookup(id, LookupIntent::Edit).await?;
    Self::found(&ctx)
  }

  #[instrument(name = "CatalogService::edit_v2", skip(self))]
  pub async fn edit_v2(&self, id: &str) -> AppResult<Product> {
    let ctx = self.lookup(id, LookupIntent::EditV2).await?;
    Self::found(&ctx)
  }

  /// Store order, names untouched.
  pub fn find_all(&self) -> ProductStream {
    self
      .store
      .find_all_products()
      .map_err(AppError::from)
      .inspect_ok(|product| info!(name = %product.name, "Listing product."))
      .boxed()
  }

  pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Product>> {
    Ok(self.store.find_product_by_id(id).await?)
  }

  pub async fn categories(&self) -> AppResult<Vec<Category>> {
    Ok(self.store.find_all_categories().try_collect().await?)
  }
}
