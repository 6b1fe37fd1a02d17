// HTTP asset client for valorant-api.com compatible services

use crate::assets::image::with_suffix;
use crate::assets::{
    AgentInfo, AssetCollection, AssetDownloadProgress, AssetImage, AssetVersion, MapInfo,
    MissionInfo, ObjectiveInfo,
};
use crate::client::client_trait::{AssetClient, ProgressCallback};
use crate::client::http;
use crate::hash;
use anyhow::Context;
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Number of catalogue endpoints fetched per collection
const CATALOGUE_STEPS: usize = 4;

pub struct HttpAssetClient {
    base_url: String,
    language: Option<String>,
}

impl HttpAssetClient {
    pub fn new(base_url: impl Into<String>, language: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language,
        }
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> String {
        let params: Vec<String> = query
            .iter()
            .map(|(k, v)| (*k, *v))
            .chain(self.language.as_deref().map(|l| ("language", l)))
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();

        if params.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, params.join("&"))
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> anyhow::Result<T> {
        let url = self.endpoint(path, query);
        debug!("Fetching {}", url);
        http::fetch_data(&url)
            .await
            .with_context(|| format!("Failed to fetch {}", path))
    }
}

#[async_trait]
impl AssetClient for HttpAssetClient {
    async fn get_current_version(&self) -> anyhow::Result<AssetVersion> {
        // version info is language independent
        let url = format!("{}/v1/version", self.base_url);
        http::fetch_data(&url)
            .await
            .context("Failed to fetch current asset version")
    }

    async fn ensure_downloaded(&self, image: &AssetImage, path: &Path) -> anyhow::Result<bool> {
        let bytes = http::fetch_bytes(image.url()).await?;
        write_if_changed(path, &bytes)
    }

    async fn collect_assets(
        &self,
        version: &AssetVersion,
        on_progress: Option<ProgressCallback<'_>>,
    ) -> anyhow::Result<AssetCollection> {
        let done = AtomicUsize::new(0);
        let report = |completed: usize| {
            if let Some(callback) = on_progress {
                callback(AssetDownloadProgress::new(completed, CATALOGUE_STEPS));
            }
        };
        let step = || report(done.fetch_add(1, Ordering::SeqCst) + 1);

        report(0);
        let (maps, agents, missions, objectives) = futures::try_join!(
            async {
                let maps: Vec<MapInfo> = self.fetch("/v1/maps", &[]).await?;
                step();
                Ok::<_, anyhow::Error>(maps)
            },
            async {
                let agents: Vec<AgentInfo> = self
                    .fetch("/v1/agents", &[("isPlayableCharacter", "true")])
                    .await?;
                step();
                Ok::<_, anyhow::Error>(agents)
            },
            async {
                let missions: Vec<MissionInfo> = self.fetch("/v1/missions", &[]).await?;
                step();
                Ok::<_, anyhow::Error>(missions)
            },
            async {
                let objectives: Vec<ObjectiveInfo> = self.fetch("/v1/objectives", &[]).await?;
                step();
                Ok::<_, anyhow::Error>(objectives)
            },
        )?;

        Ok(AssetCollection::from_parts(
            version.clone(),
            maps,
            agents,
            missions,
            objectives,
        ))
    }
}

/// Write `bytes` to `path` unless the file already holds exactly them.
/// Returns whether the file was written.
pub fn write_if_changed(path: &Path, bytes: &[u8]) -> anyhow::Result<bool> {
    if hash::file_sha256(path).is_some_and(|existing| existing == hash::sha256_hex(bytes)) {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = with_suffix(path, ".download");
    fs::write(&tmp, bytes).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(true)
}
