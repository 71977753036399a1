// catalog_app/src/models/category.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id: Option<String>, // Assigned by the store on first save
  pub name: String,
}

impl Category {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      id: None,
      name: name.into(),
    }
  }

  /// A reference to an existing category by id only, as it arrives from a product form.
  pub fn reference(id: impl Into<String>) -> Self {
    Self {
      id: Some(id.into()),
      name: String::new(),
    }
  }
}
