// Version context: the version string cached images are validated against

use crate::assets::AssetVersion;
use crate::client::AssetClient;
use crate::constants;
use crate::defaults::{Defaults, Slot};
use log::{info, warn};
use parking_lot::RwLock;

/// Holds the current image version and persists every change.
///
/// Starts out with whatever was stored last time (empty if nothing was),
/// so images can be served before the remote version is known.
pub struct VersionContext {
    current: RwLock<String>,
    slot: Slot<String>,
}

impl VersionContext {
    pub fn load(defaults: &Defaults) -> Self {
        let slot = defaults.slot::<String>(constants::IMAGE_VERSION_SLOT);
        let current = slot.get().unwrap_or_else(|e| {
            warn!("Could not read stored image version: {:#}", e);
            None
        });
        Self {
            current: RwLock::new(current.unwrap_or_default()),
            slot,
        }
    }

    pub fn current(&self) -> String {
        self.current.read().clone()
    }

    pub fn set(&self, version: &str) {
        *self.current.write() = version.to_string();
        if let Err(e) = self.slot.set(&version.to_string()) {
            warn!("Could not persist image version {}: {:#}", version, e);
        }
    }

    pub fn set_asset_version(&self, version: &AssetVersion) {
        self.set(&version.riot_client_version);
    }

    /// Fetch the remote version and make it current.
    pub async fn refresh(&self, client: &dyn AssetClient) -> anyhow::Result<AssetVersion> {
        let version = client.get_current_version().await?;
        if self.current() != version.riot_client_version {
            info!(
                "Image version changed: '{}' -> '{}'",
                self.current(),
                version.riot_client_version
            );
        }
        self.set_asset_version(&version);
        Ok(version)
    }
}
