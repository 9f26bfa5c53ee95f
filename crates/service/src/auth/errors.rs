use thiserror::Error;

use super::validation::ValidationError;
use crate::errors::ServiceError;

/// Business errors for auth workflows.
///
/// The `Display` text of the client-facing variants is the message sent back
/// to the caller; `Storage` carries internal detail and is never shown.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    ValidationFailed(#[from] ValidationError),
    #[error("Este correo ya está registrado.")]
    DuplicateEmail,
    #[error("Correo y contraseña son obligatorios.")]
    MissingCredentials,
    #[error("Credenciales inválidas.")]
    InvalidCredentials,
    #[error("storage error: {0}")]
    Storage(#[from] ServiceError),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::ValidationFailed(_) => 1001,
            AuthError::DuplicateEmail => 1002,
            AuthError::MissingCredentials => 1003,
            AuthError::InvalidCredentials => 1004,
            AuthError::Storage(_) => 1200,
        }
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::ValidationFailed(_) => "validation_failed",
            AuthError::DuplicateEmail => "duplicate_email",
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Storage(_) => "internal_error",
        }
    }
}
