// catalog_app/src/errors.rs

use crate::storage::StoreError;
use actix_web::{HttpResponse, ResponseError};
use reflow::ReflowError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Category '{id}' does not exist")]
  CategoryNotFound { id: String },

  #[error("Product '{id}' does not exist")]
  ProductNotFound { id: String },

  #[error("Storage Error: {0}")]
  Storage(#[from] StoreError),

  // The product row is already committed when this happens.
  #[error("Asset write failed for product {product_id}: {source}")]
  Asset {
    product_id: String,
    #[source]
    source: std::io::Error,
  },

  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Reflow Workflow Error: {0}")]
  Workflow(#[from] ReflowError),

  #[error("Internal Server Error: {0}")]
  Internal(String),

  #[error("Pipeline execution was halted by a handler.")]
  PipelineHaltedByHandler,
}

impl AppError {
  /// True for the "does not exist" outcomes that callers turn into a distinct answer.
  pub fn is_not_found(&self) -> bool {
    matches!(self, AppError::CategoryNotFound { .. } | AppError::ProductNotFound { .. })
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::CategoryNotFound { .. } | AppError::ProductNotFound { .. } => {
        HttpResponse::NotFound().json(json!({"error": self.to_string()}))
      }
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Storage(e) => {
        HttpResponse::ServiceUnavailable().json(json!({"error": "Storage operation failed", "detail": e.to_string()}))
      }
      AppError::Asset { product_id, .. } => HttpResponse::InternalServerError()
        .json(json!({"error": "Product saved but its image could not be stored", "product_id": product_id})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Workflow(source) => {
        tracing::error!(reflow_error_source = ?source, "Workflow error details");
        HttpResponse::InternalServerError()
          .json(json!({"error": "Workflow processing error", "detail": source.to_string()}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
      AppError::PipelineHaltedByHandler => {
        HttpResponse::Conflict().json(json!({"error": "Process halted as expected by business logic."}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
