// catalog_app/src/models/mod.rs

//! Catalog entities as the store keeps them and the pipelines pass them around.

pub mod category;
pub mod product;
pub mod upload;

pub use category::Category;
pub use product::Product;
pub use upload::UploadedFile;
