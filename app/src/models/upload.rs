// catalog_app/src/models/upload.rs

use std::fmt;

/// An image file that accompanies a product save request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UploadedFile {
  pub filename: String,
  pub content: Vec<u8>,
}

impl UploadedFile {
  pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
    Self {
      filename: filename.into(),
      content,
    }
  }

  /// Browsers submit an empty file part when no file was chosen.
  pub fn is_blank(&self) -> bool {
    self.filename.trim().is_empty()
  }
}

impl fmt::Debug for UploadedFile {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("UploadedFile")
      .field("filename", &self.filename)
      .field("content_len", &self.content.len())
      .finish()
  }
}
