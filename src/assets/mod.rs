// Asset data model: images, the versioned collection, download progress

pub mod collection;
pub mod image;
pub mod progress;

pub use collection::{
    AgentInfo, AssetCollection, AssetVersion, MapInfo, MissionInfo, ObjectiveInfo,
};
pub use image::{AssetImage, ImageMetadata};
pub use progress::AssetDownloadProgress;
