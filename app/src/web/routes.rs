// catalog_app/src/web/routes.rs

use crate::web::handlers::{api_handlers, product_handlers};
use actix_web::web;

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    // Listings, streamed as newline-delimited JSON
    .route("/", web::get().to(product_handlers::list_handler))
    .route("/list", web::get().to(product_handlers::list_handler))
    .route("/list-data-driver", web::get().to(product_handlers::list_paced_handler))
    .route("/list-full", web::get().to(product_handlers::list_full_handler))
    .route("/list-chunked", web::get().to(product_handlers::list_chunked_handler))
    .route("/categories", web::get().to(product_handlers::categories_handler))
    // Product form
    .route("/form", web::post().to(product_handlers::save_product_handler))
    .route("/form/{id}", web::get().to(product_handlers::edit_handler))
    .route("/form-v2/{id}", web::get().to(product_handlers::edit_v2_handler))
    .route("/delete/{id}", web::get().to(product_handlers::delete_handler))
    .route("/details/{id}", web::get().to(product_handlers::details_handler))
    // REST passthrough
    .service(
      web::scope("/api/v1/products")
        .route("", web::get().to(api_handlers::list_products_handler))
        .route("/{id}", web::get().to(api_handlers::get_product_handler)),
    );
}
