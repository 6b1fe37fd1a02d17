// Constants module for shared string constants

pub const DATA_DIR: &str = ".assetkeeper";
pub const CONFIG_FILE: &str = "assetkeeper.toml";
pub const IMAGES_DIR: &str = "images";
pub const DEFAULTS_DIR: &str = "defaults";
pub const DEFAULT_API_URL: &str = "https://valorant-api.com";
pub const DEFAULT_PREFETCH_JOBS: usize = 8;

/// Slot holding the version string images were last checked against.
pub const IMAGE_VERSION_SLOT: &str = "ImageManager.version";
/// Slot holding the most recently downloaded asset collection.
pub const STORED_ASSETS_SLOT: &str = "AssetManager.stored";

/// Schema version for the status --json output format.
/// Increment only on breaking changes to ensure future integrations can safely evolve.
pub const SCHEMA_VERSION: u32 = 1;
