// catalog_app/src/pipelines/category_resolver.rs

//! Resolves the category a product form refers to into the stored record.

use crate::errors::{AppError, Result as AppResult};
use crate::models::Category;
use crate::pipelines::contexts::ProductWriteCtxData;
use crate::storage::CatalogStore;
use reflow::{ContextData, PipelineControl};
use tracing::{info, instrument, warn};

/// Looks the category up in the store. There is no fallback category: absence is an error.
#[instrument(name = "category_resolver::resolve", skip(store))]
pub async fn resolve(store: &dyn CatalogStore, category_id: &str) -> AppResult<Category> {
  if category_id.trim().is_empty() {
    warn!("Product form carries no category reference.");
    return Err(AppError::CategoryNotFound { id: category_id.to_string() });
  }

  match store.find_category_by_id(category_id).await? {
    Some(category) => {
      info!(category_name = %category.name, "Category resolved.");
      Ok(category)
    }
    None => {
      warn!("Category not found.");
      Err(AppError::CategoryNotFound { id: category_id.to_string() })
    }
  }
}

/// Pipeline step: resolve the product's category reference into `resolved_category`.
pub async fn resolve_category_step(ctx_data: ContextData<ProductWriteCtxData>) -> AppResult<PipelineControl> {
  let (store, category_id) = {
    let guard = ctx_data.read();
    (guard.store.clone(), guard.product.category_id().unwrap_or_default().to_string())
  }; // guard dropped

  let category = resolve(store.as_ref(), &category_id).await?;
  ctx_data.write().resolved_category = Some(category);
  Ok(PipelineControl::Continue)
}
