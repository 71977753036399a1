// catalog_app/src/web/handlers/product_handlers.rs

use actix_web::http::header::{self, HeaderValue};
use actix_web::{web, HttpResponse};
use base64::Engine;
use chrono::NaiveDate;
use futures_util::StreamExt;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::{Category, Product, UploadedFile};
use crate::pipelines::contexts::{ListMode, ProductStream};
use crate::services::CatalogService;
use crate::state::AppState;

const SAVED: &str = "/list?success=Product+saved+successfully";
const DELETED: &str = "/list?success=Product+deleted+successfully";
const NO_SUCH_PRODUCT: &str = "/list?error=product+does+not+exist";
const NO_SUCH_PRODUCT_DETAILS: &str = "/list?error=product+does+not+exist+to+view+its+details";
const NO_SUCH_CATEGORY: &str = "/list?error=category+does+not+exist";

fn see_other(location: &str) -> HttpResponse {
  HttpResponse::SeeOther().insert_header((header::LOCATION, location)).finish()
}

/// Turns a "does not exist" outcome into a redirect; every other failure stays an error.
fn redirect_not_found(err: AppError, location: &str) -> Result<HttpResponse, AppError> {
  if err.is_not_found() {
    info!(error = %err, %location, "Redirecting after missing resource.");
    Ok(see_other(location))
  } else {
    Err(err)
  }
}

// --- Listings ---

#[derive(Deserialize, Debug, Default)]
pub struct FlashQuery {
  pub success: Option<String>,
  pub error: Option<String>,
}

fn ndjson(stream: ProductStream, flash: &FlashQuery) -> HttpResponse {
  let body = stream.map(|item| -> Result<web::Bytes, AppError> {
    let product = item?;
    let mut line = serde_json::to_vec(&product).map_err(|e| AppError::Internal(e.to_string()))?;
    line.push(b'\n');
    Ok(web::Bytes::from(line))
  });

  let mut response = HttpResponse::Ok();
  response.content_type("application/x-ndjson");
  for (name, message) in [("x-flash-success", &flash.success), ("x-flash-error", &flash.error)] {
    let Some(message) = message else { continue };
    match HeaderValue::from_str(message) {
      Ok(value) => {
        response.insert_header((name, value));
      }
      Err(_) => warn!(header = name, "Dropping flash message that is not a valid header value."),
    }
  }
  response.streaming(body)
}

async fn stream_listing(app_state: &AppState, mode: ListMode, flash: &FlashQuery) -> Result<HttpResponse, AppError> {
  let stream = app_state.catalog.list(mode).await?;
  Ok(ndjson(stream, flash))
}

#[instrument(name = "handler::list", skip(app_state))]
pub async fn list_handler(
  app_state: web::Data<AppState>,
  flash: web::Query<FlashQuery>,
) -> Result<HttpResponse, AppError> {
  stream_listing(&app_state, ListMode::Eager, &flash).await
}

#[instrument(name = "handler::list_paced", skip(app_state))]
pub async fn list_paced_handler(
  app_state: web::Data<AppState>,
  flash: web::Query<FlashQuery>,
) -> Result<HttpResponse, AppError> {
  stream_listing(&app_state, ListMode::Paced, &flash).await
}

#[instrument(name = "handler::list_full", skip(app_state))]
pub async fn list_full_handler(
  app_state: web::Data<AppState>,
  flash: web::Query<FlashQuery>,
) -> Result<HttpResponse, AppError> {
  stream_listing(&app_state, ListMode::Full, &flash).await
}

#[instrument(name = "handler::list_chunked", skip(app_state))]
pub async fn list_chunked_handler(
  app_state: web::Data<AppState>,
  flash: web::Query<FlashQuery>,
) -> Result<HttpResponse, AppError> {
  stream_listing(&app_state, ListMode::Chunked, &flash).await
}

#[instrument(name = "handler::categories", skip(app_state))]
pub async fn categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = app_state.catalog.categories().await?;
  Ok(HttpResponse::Ok().json(categories))
}

// --- Product form ---

#[derive(Deserialize, Debug)]
pub struct ImagePart {
  pub filename: String,
  pub content_base64: String,
}

/// Request body of `POST /form`.
///
/// The JSON returned by `GET /form/{id}` is itself a valid body: `image` names the stored
/// file and `category` may stand in for `category_id`. A new file goes in `upload`.
#[derive(Deserialize, Debug)]
pub struct ProductForm {
  pub id: Option<String>,
  pub name: String,
  pub price: Decimal,
  pub created_at: Option<NaiveDate>,
  #[serde(default)]
  pub category_id: String,
  #[serde(default)]
  pub category: Option<Category>,
  pub image: Option<String>,
  pub upload: Option<ImagePart>,
}

impl ProductForm {
  pub fn into_parts(self) -> Result<(Product, Option<UploadedFile>), AppError> {
    if self.name.trim().is_empty() {
      return Err(AppError::Validation("Product name must not be blank.".to_string()));
    }
    if self.price.is_sign_negative() {
      return Err(AppError::Validation("Product price must not be negative.".to_string()));
    }

    let upload = match self.upload {
      Some(part) => {
        let content = base64::engine::general_purpose::STANDARD
          .decode(part.content_base64.as_bytes())
          .map_err(|e| AppError::Validation(format!("Image content is not valid base64: {}", e)))?;
        Some(UploadedFile::new(part.filename, content))
      }
      None => None,
    };

    let category_id = match self.category.and_then(|c| c.id) {
      Some(id) if self.category_id.trim().is_empty() => id,
      _ => self.category_id,
    };

    let product = Product {
      id: self.id.filter(|id| !id.trim().is_empty()),
      name: self.name,
      price: self.price,
      created_at: self.created_at,
      image: self.image.filter(|image| !image.trim().is_empty()),
      category: Some(Category::reference(category_id)),
    };
    Ok((product, upload))
  }
}

/// Fills the creation date and image of an edited product from its stored record
/// when the form leaves them out. A new upload still replaces the image later on.
async fn carry_over_stored_fields(catalog: &CatalogService, product: &mut Product) -> Result<(), AppError> {
  let stored = match product.id.as_deref() {
    Some(id) => catalog.find_by_id(id).await?,
    None => None,
  };
  if let Some(stored) = stored {
    product.created_at = product.created_at.or(stored.created_at);
    product.image = product.image.take().or(stored.image);
  }
  Ok(())
}

#[instrument(name = "handler::save_product", skip(app_state, form), fields(product_name = %form.name))]
pub async fn save_product_handler(
  app_state: web::Data<AppState>,
  form: web::Json<ProductForm>,
) -> Result<HttpResponse, AppError> {
  let (mut product, upload) = form.into_inner().into_parts()?;
  carry_over_stored_fields(&app_state.catalog, &mut product).await?;

  match app_state.catalog.save(product, upload).await {
    Ok(saved) => {
      info!(product_id = ?saved.id, "Product saved through form.");
      Ok(see_other(SAVED))
    }
    Err(e) => redirect_not_found(e, NO_SUCH_CATEGORY),
  }
}

#[instrument(name = "handler::edit", skip(app_state))]
pub async fn edit_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product = app_state.catalog.edit(&path).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::edit_v2", skip(app_state))]
pub async fn edit_v2_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  match app_state.catalog.edit_v2(&path).await {
    Ok(product) => Ok(HttpResponse::Ok().json(product)),
    Err(e) => redirect_not_found(e, NO_SUCH_PRODUCT),
  }
}

#[instrument(name = "handler::delete", skip(app_state))]
pub async fn delete_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  match app_state.catalog.delete(&path).await {
    Ok(()) => Ok(see_other(DELETED)),
    Err(e) => {
      warn!(error = %e, "Delete did not go through.");
      redirect_not_found(e, NO_SUCH_PRODUCT)
    }
  }
}

#[instrument(name = "handler::details", skip(app_state))]
pub async fn details_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  match app_state.catalog.detail(&path).await {
    Ok(product) => Ok(HttpResponse::Ok().json(product)),
    Err(e) => redirect_not_found(e, NO_SUCH_PRODUCT_DETAILS),
  }
}
