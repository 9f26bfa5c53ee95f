//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep the server crate importing
//! `service::runtime::ensure_env` without depending directly on `common`.

use std::path::Path;

/// Ensure the data directory exists; warn when the static asset directory is missing.
pub async fn ensure_env(static_dir: &Path, data_dir: &Path) -> anyhow::Result<()> {
    common::env::ensure_env(static_dir, data_dir).await
}
