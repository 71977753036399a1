// catalog_app/src/web/handlers/api_handlers.rs

use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::Product;
use crate::state::AppState;

#[instrument(name = "handler::api_list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products: Vec<Product> = app_state.catalog.find_all().try_collect().await?;
  info!("Fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::api_get_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  match app_state.catalog.find_by_id(&product_id).await? {
    Some(product) => Ok(HttpResponse::Ok().json(product)),
    None => Err(AppError::ProductNotFound { id: product_id }),
  }
}
