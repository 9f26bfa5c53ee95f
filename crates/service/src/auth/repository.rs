use async_trait::async_trait;

use super::domain::UserRecord;
use crate::errors::ServiceError;

/// Persistence seam for the user collection.
///
/// Whole-collection semantics: `load` returns every record in stored order and
/// `save` replaces the entire collection. There are no partial updates.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn load(&self) -> Result<Vec<UserRecord>, ServiceError>;
    async fn save(&self, records: &[UserRecord]) -> Result<(), ServiceError>;
}

/// Simple in-memory store for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryUserStore {
        records: Mutex<Vec<UserRecord>>,
    }

    impl InMemoryUserStore {
        pub fn with_records(records: Vec<UserRecord>) -> Self {
            Self { records: Mutex::new(records) }
        }

        fn poisoned() -> ServiceError {
            ServiceError::StorageUnavailable("in-memory store lock poisoned".into())
        }
    }

    #[async_trait]
    impl UserStore for InMemoryUserStore {
        async fn load(&self) -> Result<Vec<UserRecord>, ServiceError> {
            let records = self.records.lock().map_err(|_| Self::poisoned())?;
            Ok(records.clone())
        }

        async fn save(&self, records: &[UserRecord]) -> Result<(), ServiceError> {
            let mut stored = self.records.lock().map_err(|_| Self::poisoned())?;
            *stored = records.to_vec();
            Ok(())
        }
    }
}
