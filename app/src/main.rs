// catalog_app/src/main.rs

use catalog_app::config::AppConfig;
use catalog_app::seed::seed_catalog;
use catalog_app::services::CatalogService;
use catalog_app::state::AppState;
use catalog_app::storage::{FsAssetStore, InMemoryCatalogStore};
use catalog_app::web::configure_app_routes;

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting catalog server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let store = Arc::new(InMemoryCatalogStore::new());
  if app_config.seed_db {
    match seed_catalog(store.as_ref()).await {
      Ok(summary) => tracing::info!(?summary, "Catalog seeded."),
      Err(e) => tracing::error!(error = %format!("{:#}", e), "Failed to seed catalog."),
    }
  }

  let assets = Arc::new(FsAssetStore::new(app_config.uploads_path.clone()));
  let catalog = CatalogService::new(store, assets, app_config.list.clone());
  tracing::info!("Reflow pipelines registered.");

  let app_state = AppState {
    catalog,
    config: app_config.clone(),
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
