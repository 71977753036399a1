// catalog_app/src/pipelines/mod.rs

//! Defines and registers all Reflow pipelines used by the catalog.

use crate::errors::AppError;
use reflow::Reflow;
use std::sync::Arc;

pub mod contexts;

pub mod category_resolver;
pub mod list_pipeline;
pub mod lookup_pipeline;
pub mod product_write_pipeline;

/// Registers every catalog pipeline with `reflow`. Called once per registry at startup.
pub fn register_all_pipelines(reflow: &Arc<Reflow<AppError>>) {
  tracing::info!("Registering Reflow pipelines...");

  product_write_pipeline::register_product_write_pipeline(reflow);
  list_pipeline::register_list_pipeline(reflow);
  lookup_pipeline::register_lookup_pipeline(reflow);

  tracing::info!("All catalog pipelines registered with Reflow.");
}
