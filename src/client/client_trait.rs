// Trait definition for the remote asset service

use crate::assets::{AssetCollection, AssetDownloadProgress, AssetImage, AssetVersion};
use anyhow::Result;
use std::path::Path;

/// Callback invoked as a collection download advances
pub type ProgressCallback<'a> = &'a (dyn Fn(AssetDownloadProgress) + Send + Sync);

/// Trait for the network side of asset caching
#[async_trait::async_trait]
pub trait AssetClient: Send + Sync {
    /// Fetch the currently published asset version
    async fn get_current_version(&self) -> Result<AssetVersion>;

    /// Make sure `image` is present at `path`
    ///
    /// # Returns
    /// `true` if the file at `path` was created or replaced, `false` if the
    /// existing file already held the current content
    async fn ensure_downloaded(&self, image: &AssetImage, path: &Path) -> Result<bool>;

    /// Download the full catalogue for `version`
    ///
    /// # Arguments
    /// * `version` - The version the collection gets tagged with
    /// * `on_progress` - Optional callback receiving incremental progress
    async fn collect_assets(
        &self,
        version: &AssetVersion,
        on_progress: Option<ProgressCallback<'_>>,
    ) -> Result<AssetCollection>;
}
