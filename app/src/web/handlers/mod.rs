// catalog_app/src/web/handlers/mod.rs

pub mod api_handlers;
pub mod product_handlers;
