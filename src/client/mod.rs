// Client module for talking to the remote asset service

pub mod client_trait;
pub mod http;
pub mod valorant_api;

pub use client_trait::{AssetClient, ProgressCallback};
pub use valorant_api::HttpAssetClient;
