use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Liveness probe payload: `{ ok, service, timestamp }`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Health {
    pub ok: bool,
    pub service: String,
    pub timestamp: DateTime<Utc>,
}

impl Health {
    pub fn now(service: impl Into<String>) -> Self {
        Self { ok: true, service: service.into(), timestamp: Utc::now() }
    }
}
