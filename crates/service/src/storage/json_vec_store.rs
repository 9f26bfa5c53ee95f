use std::{io::ErrorKind, marker::PhantomData, path::{Path, PathBuf}};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tracing::debug;

use crate::errors::ServiceError;

/// Generic JSON file-backed sequence store.
///
/// Persists a `Vec<T>` as one pretty-printed JSON array. Every `load` reads the
/// whole file and every `save` rewrites it; nothing is cached and nothing is
/// locked, so concurrent writers race and the last one wins.
#[derive(Debug, Clone)]
pub struct JsonVecStore<T> {
    file_path: PathBuf,
    _items: PhantomData<fn() -> T>,
}

impl<T> JsonVecStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind the store to a path. The file is created lazily on first `load`.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into(), _items: PhantomData }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Create the parent directories and an empty `[]` document if the file is absent.
    async fn ensure_exists(&self) -> Result<(), ServiceError> {
        match fs::metadata(&self.file_path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Some(parent) = self.file_path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)
                            .await
                            .map_err(|e| ServiceError::io(parent, e))?;
                    }
                }
                fs::write(&self.file_path, b"[]")
                    .await
                    .map_err(|e| ServiceError::io(&self.file_path, e))?;
                debug!(path = %self.file_path.display(), "initialized empty store document");
                Ok(())
            }
            Err(e) => Err(ServiceError::io(&self.file_path, e)),
        }
    }

    /// Read the full sequence, initializing the document first when missing.
    pub async fn load(&self) -> Result<Vec<T>, ServiceError> {
        self.ensure_exists().await?;
        let bytes = fs::read(&self.file_path)
            .await
            .map_err(|e| ServiceError::io(&self.file_path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::Malformed(e.to_string()))
    }

    /// Overwrite the document with `items`, order preserved.
    pub async fn save(&self, items: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(items).map_err(|e| ServiceError::Malformed(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::io(&self.file_path, e))
    }
}
