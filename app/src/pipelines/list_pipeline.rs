// catalog_app/src/pipelines/list_pipeline.rs

//! Builds the product listing stream.
//!
//! Every step only composes operators onto the stream held in the context; nothing is
//! pulled from the store until the caller starts consuming the finished stream. The
//! composition order is fixed:
//!
//! `fetch -> uppercase -> amplify (Full, Chunked) -> pace (Paced) -> lookahead (Chunked) -> diagnostics`
//!
//! Diagnostics sit last, on the consumer side of the lookahead window, so the sink sees
//! exactly the elements the consumer receives and goes quiet as soon as the stream is dropped.

use crate::errors::AppError;
use crate::models::Product;
use crate::pipelines::contexts::{DiagnosticSink, ListMode, ProductListCtxData, ProductStream};
use futures_util::stream::{StreamExt, TryStreamExt};
use reflow::{ContextData, FluxExt, Pipeline, PipelineControl, Reflow, SkipCondition};
use std::sync::Arc;
use tracing::{debug, info};

/// Default diagnostic sink: one log event per emitted product.
pub fn log_product_name() -> DiagnosticSink {
  Arc::new(|product: &Product| info!(target: "catalog_app::listing", name = %product.name, "Emitted product."))
}

pub fn uppercase_name(mut product: Product) -> Product {
  product.name = product.name.to_uppercase();
  product
}

/// Takes the stream out of the context, wraps it with `f` and puts it back.
fn rewrap(
  ctx_data: &ContextData<ProductListCtxData>,
  step: &str,
  f: impl FnOnce(ProductStream, &ProductListCtxData) -> Result<ProductStream, AppError>,
) -> Result<PipelineControl, AppError> {
  let guard = ctx_data.read();
  let stream = guard
    .output
    .take()
    .ok_or_else(|| AppError::Internal(format!("listing step '{}' found no stream to extend", step)))?;
  let wrapped = f(stream, &*guard)?;
  guard.output.put(wrapped);
  Ok(PipelineControl::Continue)
}

pub fn register_list_pipeline(reflow: &Arc<Reflow<AppError>>) {
  let unless_amplified: SkipCondition<ProductListCtxData> =
    Arc::new(|ctx: ContextData<ProductListCtxData>| !ctx.read().mode.is_amplified());
  let unless_paced: SkipCondition<ProductListCtxData> =
    Arc::new(|ctx: ContextData<ProductListCtxData>| ctx.read().mode != ListMode::Paced);
  let unless_chunked: SkipCondition<ProductListCtxData> =
    Arc::new(|ctx: ContextData<ProductListCtxData>| ctx.read().mode != ListMode::Chunked);

  let mut p = Pipeline::<ProductListCtxData, AppError>::new(&[
    ("fetch_products", false, None),
    ("uppercase_names", false, None),
    ("amplify", false, Some(unless_amplified)),
    ("pace", false, Some(unless_paced)),
    ("bound_lookahead", false, Some(unless_chunked)),
    ("attach_diagnostics", false, None),
  ]);

  p.on_root("fetch_products", |ctx_data: ContextData<ProductListCtxData>| {
    Box::pin(async move {
      let guard = ctx_data.read();
      debug!(mode = ?guard.mode, "Opening product cursor.");
      let source: ProductStream = guard.store.find_all_products().map_err(AppError::from).boxed();
      guard.output.put(source);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("uppercase_names", |ctx_data: ContextData<ProductListCtxData>| {
    Box::pin(async move { rewrap(&ctx_data, "uppercase_names", |s, _| Ok(s.map_ok(uppercase_name).boxed())) })
  });

  // Whole base cycles are concatenated; the store is read once.
  p.on_root("amplify", |ctx_data: ContextData<ProductListCtxData>| {
    Box::pin(async move {
      rewrap(&ctx_data, "amplify", |s, ctx| {
        debug!(extra_cycles = ctx.settings.repeat_count, "Amplifying listing.");
        Ok(s.repeat_cycles(ctx.settings.repeat_count).boxed())
      })
    })
  });

  p.on_root("pace", |ctx_data: ContextData<ProductListCtxData>| {
    Box::pin(async move {
      rewrap(&ctx_data, "pace", |s, ctx| Ok(s.delay_elements(ctx.settings.pace).boxed()))
    })
  });

  p.on_root("bound_lookahead", |ctx_data: ContextData<ProductListCtxData>| {
    Box::pin(async move {
      rewrap(&ctx_data, "bound_lookahead", |s, ctx| {
        let window = s.bounded_lookahead(ctx.settings.lookahead)?;
        debug!(capacity = window.capacity(), "Listing handed to lookahead producer.");
        Ok(window.boxed())
      })
    })
  });

  p.on_root("attach_diagnostics", |ctx_data: ContextData<ProductListCtxData>| {
    Box::pin(async move {
      rewrap(&ctx_data, "attach_diagnostics", |s, ctx| {
        let sink = ctx.sink.clone();
        Ok(
          s.inspect(move |item| {
            if let Ok(product) = item {
              sink(product);
            }
          })
          .boxed(),
        )
      })
    })
  });

  reflow.register_pipeline(p);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::Category;
  use rust_decimal_macros::dec;

  #[test]
  fn uppercase_changes_only_the_name() {
    let mut original = Product::new("Silla de oficina", dec!(540.00), Category::new("Muebles"));
    original.id = Some("p-1".to_string());

    let mapped = uppercase_name(original.clone());

    assert_eq!(mapped.name, "SILLA DE OFICINA");
    assert_eq!(Product { name: original.name.clone(), ..mapped }, original);
  }
}
