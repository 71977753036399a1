// catalog_app/src/services/mod.rs

pub mod catalog_service;

pub use catalog_service::CatalogService;
