//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the assets directory is present (warn only) and the parent directory
/// of the store file exists.
pub async fn ensure_env(assets_dir: &str, store_path: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(assets_dir).await.is_err() {
        warn!(%assets_dir, "assets directory not found; /app requests will 404");
    }
    if let Some(parent) = Path::new(store_path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

/// Delete the store file if present. Used by the `--debug` startup flag.
pub async fn remove_store_file(store_path: &str) -> anyhow::Result<()> {
    match tokio::fs::remove_file(store_path).await {
        Ok(()) => {
            info!(%store_path, "removed store file");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(anyhow::anyhow!("cannot remove {store_path}: {e}")),
    }
}
