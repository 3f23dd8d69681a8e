//! Startup preparation for the store file and assets directory.

use tracing::warn;

/// Ensure expected directories exist and, when `debug` is set, start from an
/// empty store by deleting the existing document.
pub async fn prepare_store(assets_dir: &str, store_path: &str, debug: bool) -> anyhow::Result<()> {
    common::env::ensure_env(assets_dir, store_path).await?;
    if debug {
        warn!(%store_path, "debug mode: discarding existing store");
        common::env::remove_store_file(store_path).await?;
    }
    Ok(())
}
