// catalog_app/src/lib.rs

//! Product and category catalog built on Reflow pipelines.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod seed;
pub mod services;
pub mod state;
pub mod storage;
pub mod web;

pub use errors::{AppError, Result};
