use thiserror::Error;

/// Failures of the persistence layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("malformed store document: {0}")]
    Malformed(String),
}

impl ServiceError {
    pub fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::StorageUnavailable(format!("{}: {}", path.display(), err))
    }
}
