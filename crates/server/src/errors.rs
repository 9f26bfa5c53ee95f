use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use service::auth::AuthError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor.";

/// Failure envelope sent to clients: `{ "ok": false, "message": ... }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn internal() -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: INTERNAL_ERROR_MESSAGE.into() }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::ValidationFailed(_) | AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Storage(e) => {
                // Real cause goes to the log only
                error!(code = err.code(), error = %e, "auth request failed");
                return Self::internal();
            }
        };
        Self { status, message: err.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "ok": false, "message": self.message }))).into_response()
    }
}
