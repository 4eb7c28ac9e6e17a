//! Dependency asset loading seam

use anyhow::Result;
use async_trait::async_trait;

/// Fetches the scripts and stylesheets a form depends on.
///
/// Fetching happens in two steps: the script loader itself, then the assets
/// through it. The [`ReadinessMachine`](crate::ReadinessMachine) decides when
/// each step runs.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// Whether the script loader is already available.
    fn loader_available(&self) -> bool;

    /// Fetches the script loader.
    async fn fetch_loader(&self) -> Result<()>;

    /// Fetches `assets` (full paths) through the script loader.
    async fn fetch_assets(&self, assets: &[String]) -> Result<()>;

    /// Text of the language file at `path` (a flat TOML table), once
    /// fetched. `None` leaves a form on the context's catalog.
    fn dictionary(&self, _path: &str) -> Option<String> {
        None
    }
}
