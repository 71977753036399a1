// catalog_app/src/models/product.rs

use crate::models::category::Category;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog product.
///
/// `category` is a snapshot of the category taken when the product was saved,
/// not a live reference: renaming a category later leaves saved products untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: Option<String>,
  pub name: String,
  pub price: Decimal,
  pub created_at: Option<NaiveDate>,
  pub image: Option<String>,
  pub category: Option<Category>,
}

impl Product {
  pub fn new(name: impl Into<String>, price: Decimal, category: Category) -> Self {
    Self {
      name: name.into(),
      price,
      category: Some(category),
      ..Default::default()
    }
  }

  /// A persisted product always carries a non-empty id.
  pub fn is_persisted(&self) -> bool {
    self.id.as_deref().is_some_and(|id| !id.is_empty())
  }

  pub fn category_id(&self) -> Option<&str> {
    self.category.as_ref().and_then(|c| c.id.as_deref())
  }
}
