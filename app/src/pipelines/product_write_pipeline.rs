// catalog_app/src/pipelines/product_write_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::category_resolver::resolve_category_step;
use crate::pipelines::contexts::ProductWriteCtxData;
use reflow::{ContextData, Pipeline, PipelineControl, Reflow, SkipCondition};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Characters that break multipart headers, URLs or file paths on some clients.
const UNSAFE_FILENAME_CHARS: [char; 3] = [' ', ':', '\\'];

/// Builds a unique stored name for an uploaded file: a fresh UUID, a dash and the
/// original name, with spaces, colons and backslashes removed from the result.
pub fn generate_image_filename(original: &str) -> String {
  format!("{}-{}", Uuid::new_v4(), original).replace(UNSAFE_FILENAME_CHARS, "")
}

pub fn register_product_write_pipeline(reflow: &Arc<Reflow<AppError>>) {
  let no_named_upload: SkipCondition<ProductWriteCtxData> =
    Arc::new(|ctx: ContextData<ProductWriteCtxData>| ctx.read().named_upload().is_none());
  let no_generated_filename: SkipCondition<ProductWriteCtxData> =
    Arc::new(|ctx: ContextData<ProductWriteCtxData>| ctx.read().generated_filename.is_none());

  let mut p = Pipeline::<ProductWriteCtxData, AppError>::new(&[
    ("resolve_category", false, None),
    ("stamp_creation_date", false, None),
    ("assign_image_filename", true, Some(no_named_upload)),
    ("attach_category", false, None),
    ("persist_product", false, None),
    ("store_upload", true, Some(no_generated_filename)),
  ]);

  // Step 1: a product may only be written against a category that exists.
  p.on_root("resolve_category", resolve_category_step);

  // Step 2: default the creation date to today.
  p.on_root("stamp_creation_date", |ctx_data: ContextData<ProductWriteCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      if guard.product.created_at.is_none() {
        let today = chrono::Local::now().date_naive();
        guard.product.created_at = Some(today);
        info!(%today, "Creation date stamped.");
      }
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 3: the stored name is fixed before persisting so the record carries it.
  p.on_root("assign_image_filename", |ctx_data: ContextData<ProductWriteCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let Some(original) = guard.named_upload().map(|u| u.filename.clone()) else {
        return Ok::<_, AppError>(PipelineControl::Continue);
      };
      let filename = generate_image_filename(&original);
      info!(%original, %filename, "Image filename generated.");
      guard.product.image = Some(filename.clone());
      guard.generated_filename = Some(filename);
      Ok(PipelineControl::Continue)
    })
  });

  // Step 4: embed a snapshot of the resolved category.
  p.on_root("attach_category", |ctx_data: ContextData<ProductWriteCtxData>| {
    Box::pin(async move {
      let mut guard = ctx_data.write();
      let category = guard.resolved_category.clone().ok_or_else(|| {
        AppError::Internal("attach_category ran without a resolved category".to_string())
      })?;
      guard.product.category = Some(category);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 5: commit point. Storage failures propagate as they are.
  p.on_root("persist_product", |ctx_data: ContextData<ProductWriteCtxData>| {
    Box::pin(async move {
      let (store, product) = {
        let guard = ctx_data.read();
        (guard.store.clone(), guard.product.clone())
      };

      let saved = store.save_product(product).await?;
      info!(product_id = ?saved.id, name = %saved.name, "Product saved.");
      ctx_data.write().persisted = Some(saved);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Step 6: write the bytes under the generated name. Not rolled back into step 5.
  p.on_root("store_upload", |ctx_data: ContextData<ProductWriteCtxData>| {
    Box::pin(async move {
      let (assets, filename, upload, product_id) = {
        let guard = ctx_data.read();
        (
          guard.assets.clone(),
          guard.generated_filename.clone(),
          guard.upload.clone(),
          guard.persisted.as_ref().and_then(|p| p.id.clone()).unwrap_or_default(),
        )
      };
      let (Some(filename), Some(upload)) = (filename, upload) else {
        return Ok::<_, AppError>(PipelineControl::Continue);
      };

      match assets.write_bytes(&filename, &upload.content).await {
        Ok(path) => {
          ctx_data.write().asset_path = Some(path);
          Ok(PipelineControl::Continue)
        }
        Err(source) => {
          warn!(%product_id, %filename, error = %source, "Asset write failed after the product was saved.");
          Err(AppError::Asset { product_id, source })
        }
      }
    })
  });

  reflow.register_pipeline(p);
}
