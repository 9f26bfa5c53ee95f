//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::warn;

/// Ensure the data directory exists; warn when the static asset directory is missing.
pub async fn ensure_env(static_dir: &Path, data_dir: &Path) -> anyhow::Result<()> {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(static_dir = %static_dir.display(), "static assets directory not found; pages will 404");
    }
    if data_dir.as_os_str().is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    Ok(())
}
