// catalog_app/src/pipelines/lookup_pipeline.rs

//! Existence-checked lookups: detail, delete, edit and edit-v2 share one pipeline and
//! differ only in which steps the context's `LookupIntent` lets run.

use crate::errors::AppError;
use crate::models::Product;
use crate::pipelines::contexts::{LookupIntent, ProductLookupCtxData};
use reflow::{ContextData, Pipeline, PipelineControl, Reflow, SkipCondition};
use std::sync::Arc;
use tracing::{info, warn};

pub fn register_lookup_pipeline(reflow: &Arc<Reflow<AppError>>) {
  let unless_editing: SkipCondition<ProductLookupCtxData> = Arc::new(|ctx: ContextData<ProductLookupCtxData>| {
    !matches!(ctx.read().intent, LookupIntent::Edit | LookupIntent::EditV2)
  });
  let when_plain_edit: SkipCondition<ProductLookupCtxData> =
    Arc::new(|ctx: ContextData<ProductLookupCtxData>| ctx.read().intent == LookupIntent::Edit);
  let unless_deleting: SkipCondition<ProductLookupCtxData> =
    Arc::new(|ctx: ContextData<ProductLookupCtxData>| ctx.read().intent != LookupIntent::Delete);

  let mut p = Pipeline::<ProductLookupCtxData, AppError>::new(&[
    ("find_product", false, None),
    ("substitute_blank", false, Some(unless_editing)),
    ("require_identifier", false, Some(when_plain_edit)),
    ("delete_product", false, Some(unless_deleting)),
  ]);

  p.on_root("find_product", |ctx_data: ContextData<ProductLookupCtxData>| {
    Box::pin(async move {
      let (store, product_id) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.product_id.clone())
      };

      let found = store.find_product_by_id(&product_id).await?;
      info!(%product_id, found = found.is_some(), "Product lookup finished.");
      ctx_data.write().found = found;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // The edit form always gets something to render.
  p.on_root("substitute_blank", |ctx_data: ContextData<ProductLookupCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      if guard.found.is_none() {
        guard.found = Some(Product::default());
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // A blank placeholder counts as absent: only a record with an id passes.
  p.on_root("require_identifier", |ctx_data: ContextData<ProductLookupCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      if guard.found.as_ref().is_some_and(Product::is_persisted) {
        return Ok(PipelineControl::Continue);
      }
      warn!(product_id = %guard.product_id, intent = ?guard.intent, "Product does not exist.");
      Err(AppError::ProductNotFound {
        id: guard.product_id.clone(),
      })
    })
  });

  p.on_root("delete_product", |ctx_data: ContextData<ProductLookupCtxData>| {
    Box::pin(async move {
      let (store, product) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.found.clone())
      };
      let product = product.ok_or_else(|| AppError::Internal("delete_product ran without a found product".to_string()))?;

      store.delete_product(&product).await?;
      info!(product_id = ?product.id, "Product deleted.");
      ctx_data.write().deleted = true;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  reflow.register_pipeline(p);
}
