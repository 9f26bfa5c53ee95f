use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::auth::domain::UserRecord;
use crate::auth::repository::UserStore;
use crate::errors::ServiceError;
use crate::storage::json_vec_store::JsonVecStore;

/// Users persisted as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileUserStore {
    store: JsonVecStore<UserRecord>,
}

impl JsonFileUserStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { store: JsonVecStore::new(path) }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }
}

#[async_trait]
impl UserStore for JsonFileUserStore {
    async fn load(&self) -> Result<Vec<UserRecord>, ServiceError> {
        self.store.load().await
    }

    async fn save(&self, records: &[UserRecord]) -> Result<(), ServiceError> {
        self.store.save(records).await
    }
}
