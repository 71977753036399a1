// reflow/examples/basic_pipeline.rs

use reflow::{ContextData, Pipeline, PipelineControl, PipelineResult, Reflow, ReflowError, ReflowResult};
use tracing::info;

// 1. Context data for one run of the pipeline
#[derive(Clone, Debug, Default)]
struct OrderDraft {
  sku: String,
  quantity: u32,
  reserved: bool,
  audit: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), ReflowError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // 2. Steps run in this order; the third one only runs for bulk orders.
  let mut pipeline = Pipeline::<OrderDraft, ReflowError>::new(&[
    ("normalize_sku", false, None),
    ("reserve_stock", false, None),
    (
      "flag_bulk_order",
      true,
      Some(std::sync::Arc::new(|ctx: ContextData<OrderDraft>| ctx.read().quantity < 100)),
    ),
  ]);

  pipeline.on_root("normalize_sku", |ctx: ContextData<OrderDraft>| {
    Box::pin(async move {
      let mut draft = ctx.write();
      draft.sku = draft.sku.trim().to_uppercase();
      let line = format!("normalized sku to {}", draft.sku);
      draft.audit.push(line);
      ReflowResult::<_>::Ok(PipelineControl::Continue)
    })
  });

  pipeline.on_root("reserve_stock", |ctx: ContextData<OrderDraft>| {
    Box::pin(async move {
      tokio::time::sleep(std::time::Duration::from_millis(10)).await;
      let mut draft = ctx.write();
      draft.reserved = true;
      let line = format!("reserved {} x {}", draft.quantity, draft.sku);
      draft.audit.push(line);
      Ok::<_, ReflowError>(PipelineControl::Continue)
    })
  });

  pipeline.after_root("flag_bulk_order", |ctx: ContextData<OrderDraft>| {
    Box::pin(async move {
      ctx.write().audit.push("flagged for bulk review".to_string());
      Ok::<_, ReflowError>(PipelineControl::Continue)
    })
  });

  // 3. Hand the pipeline to a registry and run it through the registry.
  let registry = Reflow::<ReflowError>::new();
  registry.register_pipeline(pipeline);

  let ctx = ContextData::new(OrderDraft {
    sku: "  kb-104 ".to_string(),
    quantity: 3,
    ..Default::default()
  });
  let result = registry.run(ctx.clone()).await?;

  // 4. Read the outcome from the caller's clone of the context.
  assert_eq!(result, PipelineResult::Completed);
  let draft = ctx.read();
  info!(sku = %draft.sku, reserved = draft.reserved, "Pipeline finished.");
  for line in &draft.audit {
    info!("- {}", line);
  }
  assert_eq!(draft.audit.len(), 2);

  Ok(())
}
