use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use service::auth::domain::{LoginInput, RegisterInput, UserView};
use service::auth::AuthService;

use crate::errors::ApiError;
use crate::observability::record_auth;

#[derive(Clone)]
pub struct ServerState {
    pub auth: AuthService,
    pub service_name: Arc<str>,
}

impl ServerState {
    pub fn new(auth: AuthService, service_name: impl Into<Arc<str>>) -> Self {
        Self { auth, service_name: service_name.into() }
    }
}

/// Body of `POST /api/register`.
///
/// Fields are read one by one: absent, `null` or non-string values become
/// empty strings without discarding the fields next to them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: Option<Value>,
    pub email: Option<Value>,
    pub password: Option<Value>,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(r: RegisterRequest) -> Self {
        RegisterInput { full_name: text(r.full_name), email: text(r.email), password: text(r.password) }
    }
}

/// Body of `POST /api/login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<Value>,
    pub password: Option<Value>,
}

impl From<LoginRequest> for LoginInput {
    fn from(r: LoginRequest) -> Self {
        LoginInput { email: text(r.email), password: text(r.password) }
    }
}

fn text(field: Option<Value>) -> String {
    match field {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

#[derive(Debug, Serialize)]
pub struct AuthOutput {
    pub ok: bool,
    pub message: &'static str,
    pub user: UserView,
}

impl AuthOutput {
    fn new(message: &'static str, user: UserView) -> Self {
        Self { ok: true, message, user }
    }
}

/// An unreadable body (no JSON content type, bad syntax, not an object)
/// is handled as an empty payload so the usual field checks answer it.
fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "unreadable request body, treating as empty");
            T::default()
        }
    }
}

pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthOutput>), ApiError> {
    let input: RegisterInput = body_or_default(payload).into();
    match state.auth.register(input).await {
        Ok(user) => {
            record_auth("register", "success");
            Ok((StatusCode::CREATED, Json(AuthOutput::new("Registro exitoso.", user))))
        }
        Err(e) => {
            record_auth("register", e.kind());
            Err(e.into())
        }
    }
}

pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthOutput>, ApiError> {
    let input: LoginInput = body_or_default(payload).into();
    match state.auth.login(input).await {
        Ok(user) => {
            record_auth("login", "success");
            Ok(Json(AuthOutput::new("Inicio de sesión exitoso.", user)))
        }
        Err(e) => {
            record_auth("login", e.kind());
            Err(e.into())
        }
    }
}
