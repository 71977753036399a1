// catalog_app/src/storage/assets.rs

use crate::storage::AssetStore;
use async_trait::async_trait;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{info, instrument};

/// Writes uploaded assets below a base directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsAssetStore {
  base_dir: PathBuf,
}

impl FsAssetStore {
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self {
      base_dir: base_dir.into(),
    }
  }

  pub fn base_dir(&self) -> &Path {
    &self.base_dir
  }
}

#[async_trait]
impl AssetStore for FsAssetStore {
  #[instrument(name = "FsAssetStore::write_bytes", skip(self, content), fields(bytes = content.len()))]
  async fn write_bytes(&self, filename: &str, content: &[u8]) -> io::Result<PathBuf> {
    // A single plain file name; anything that could climb out of base_dir is refused.
    let mut components = Path::new(filename).components();
    if !matches!((components.next(), components.next()), (Some(Component::Normal(_)), None)) {
      return Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("asset filename '{}' is not a plain file name", filename),
      ));
    }

    tokio::fs::create_dir_all(&self.base_dir).await?;
    let path = self.base_dir.join(filename);
    tokio::fs::write(&path, content).await?;
    info!(path = %path.display(), "Asset written.");
    Ok(path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn writes_below_base_dir_creating_it() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FsAssetStore::new(tmp.path().join("uploads"));

    let path = store.write_bytes("abc-photo.png", b"png-bytes").await.unwrap();

    assert_eq!(path, tmp.path().join("uploads").join("abc-photo.png"));
    assert_eq!(tokio::fs::read(&path).await.unwrap(), b"png-bytes");
  }

  #[tokio::test]
  async fn refuses_names_that_leave_base_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FsAssetStore::new(tmp.path());

    for name in ["../escape.png", "nested/dir.png", ""] {
      let err = store.write_bytes(name, b"x").await.unwrap_err();
      assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "name {:?}", name);
    }
  }
}
