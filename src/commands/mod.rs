// Commands module: one file per subcommand plus the shared wiring

pub mod clear;
pub mod image;
pub mod load;
pub mod prefetch;
pub mod status;
pub mod version;

use crate::asset_manager::AssetManager;
use crate::client::{AssetClient, HttpAssetClient};
use crate::config::{self, Settings};
use crate::defaults::Defaults;
use crate::image_manager::ImageManager;
use crate::version::VersionContext;
use std::sync::Arc;

/// Everything a command needs to build managers.
pub struct Context {
    pub settings: Settings,
    pub defaults: Defaults,
    pub client: Arc<dyn AssetClient>,
}

impl Context {
    pub fn load() -> anyhow::Result<Self> {
        let settings = Settings::load()?;
        let client = Arc::new(HttpAssetClient::new(
            settings.api_url.clone(),
            settings.language.clone(),
        ));
        Ok(Self {
            settings,
            defaults: Defaults::new(config::defaults_dir()),
            client,
        })
    }

    pub fn asset_manager(&self) -> AssetManager {
        AssetManager::new(self.client.clone(), &self.defaults)
    }

    pub fn image_manager(&self) -> ImageManager {
        ImageManager::new(
            self.client.clone(),
            config::images_dir(),
            Arc::new(VersionContext::load(&self.defaults)),
        )
    }
}
