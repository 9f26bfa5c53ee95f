use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Registration input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Persisted user record, as stored in the users document.
///
/// The password is kept in plaintext. `createdAt` is carried as written;
/// records created here use `YYYY-MM-DDTHH:MM:SS.mmmZ`. Fields this type
/// does not know about are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    pub fn new(id: i64, full_name: String, email: String, password: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            full_name,
            email,
            password,
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            extra: Map::new(),
        }
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }

    pub fn view(&self) -> UserView {
        UserView { id: self.id, full_name: self.full_name.clone(), email: self.email.clone() }
    }
}

/// Public view of a user (no password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i64,
    pub full_name: String,
    pub email: String,
}
